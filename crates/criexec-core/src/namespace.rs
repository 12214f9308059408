//! Namespace selection for the namespace-entry helper.
//!
//! The helper attaches to an existing process with `-t <pid>` and joins
//! one namespace per flag: `-p` (pid), `-m` (mount), `-n` (network).
//! Everything after `--` is the program to run inside them.

use nix::unistd::Pid;

/// Set of namespaces of the target process to join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamespaceSet {
    /// Join the PID namespace.
    pub pid: bool,
    /// Join the mount namespace.
    pub mount: bool,
    /// Join the network namespace.
    pub network: bool,
}

impl NamespaceSet {
    /// Namespaces joined when streaming files: pid and mount.
    pub const FILES: Self = Self {
        pid: true,
        mount: true,
        network: false,
    };

    /// Namespaces joined when running commands: pid, mount and network.
    pub const COMMAND: Self = Self {
        pid: true,
        mount: true,
        network: true,
    };

    /// Builds the helper arguments that precede the program to run.
    ///
    /// The returned vector always ends with the `--` separator.
    #[must_use]
    pub fn helper_args(&self, target: Pid) -> Vec<String> {
        let mut args = vec!["-t".to_string(), target.to_string()];
        if self.pid {
            args.push("-p".into());
        }
        if self.mount {
            args.push("-m".into());
        }
        if self.network {
            args.push("-n".into());
        }
        args.push("--".into());
        args
    }
}

/// Quotes `value` for safe interpolation into a POSIX shell command line.
#[must_use]
pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_set_joins_network() {
        let args = NamespaceSet::COMMAND.helper_args(Pid::from_raw(4242));
        assert_eq!(args, ["-t", "4242", "-p", "-m", "-n", "--"]);
    }

    #[test]
    fn file_set_skips_network() {
        let args = NamespaceSet::FILES.helper_args(Pid::from_raw(7));
        assert_eq!(args, ["-t", "7", "-p", "-m", "--"]);
    }

    #[test]
    fn shell_quote_wraps_plain_values() {
        assert_eq!(shell_quote("/tmp/a b"), "'/tmp/a b'");
    }

    #[test]
    fn shell_quote_escapes_single_quotes() {
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
    }
}

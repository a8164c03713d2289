//! `ssh` option catalog.
//!
//! A rendered ssh command is what rsync expects for its `rsh` option.

use std::sync::{Arc, OnceLock};

use super::Tool;
use crate::schema::{OptionSchema, OptionSpec};

const OPTIONS: &[(&str, OptionSpec)] = &[
    ("ipv4", OptionSpec::switch("4")),
    ("ipv6", OptionSpec::switch("6")),
    ("forward_agent", OptionSpec::switch("A")),
    ("no_forward_agent", OptionSpec::switch("a")),
    ("compression", OptionSpec::switch("C")),
    ("background", OptionSpec::switch("f")),
    ("no_command", OptionSpec::switch("N")),
    ("quiet", OptionSpec::switch("q")),
    ("disable_tty", OptionSpec::switch("T")),
    ("force_tty", OptionSpec::switch("t")),
    ("verbose", OptionSpec::switch("v")),
    ("port", OptionSpec::argument("p")),
    ("login_name", OptionSpec::argument("l")),
    ("config_file", OptionSpec::argument("F")),
    ("jump_host", OptionSpec::argument("J")),
    ("cipher", OptionSpec::argument("c")),
    ("identity_file", OptionSpec::repeatable("i")),
    ("option", OptionSpec::repeatable("o")),
    ("local_forward", OptionSpec::repeatable("L")),
    ("remote_forward", OptionSpec::repeatable("R")),
    ("dynamic_forward", OptionSpec::repeatable("D")),
];

/// The OpenSSH client.
#[derive(Debug, Clone, Copy)]
pub struct Ssh;

impl Tool for Ssh {
    const EXECUTABLE: &'static str = "ssh";

    fn schema() -> Arc<OptionSchema> {
        static SCHEMA: OnceLock<Arc<OptionSchema>> = OnceLock::new();
        Arc::clone(SCHEMA.get_or_init(|| Arc::new(OptionSchema::from_table(OPTIONS))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::escape::quote;
    use crate::options::OptionStore;
    use crate::tools::Rsync;

    #[test]
    fn catalog_has_unique_names() {
        assert_eq!(Ssh::schema().len(), OPTIONS.len());
    }

    #[test]
    fn rendered_ssh_feeds_rsync_rsh() {
        let mut ssh = OptionStore::new(Ssh::schema());
        ssh.enable("compression")
            .unwrap()
            .set_option("port", 2222)
            .unwrap()
            .set_option("option", ["StrictHostKeyChecking=no"])
            .unwrap();
        let remote_shell = format!("ssh{}", ssh.options_string());
        assert_eq!(
            remote_shell,
            format!("ssh -C -p {} -o {}", quote("2222"), quote("StrictHostKeyChecking=no"))
        );

        let mut rsync = OptionStore::new(Rsync::schema());
        rsync.set_option("rsh", remote_shell.as_str()).unwrap();
        assert_eq!(rsync.options_string(), format!(" -e {}", quote(&remote_shell)));
    }
}

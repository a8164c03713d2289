//! `rsync` option catalog.

use std::sync::{Arc, OnceLock};

use super::Tool;
use crate::schema::{OptionSchema, OptionSpec};

const OPTIONS: &[(&str, OptionSpec)] = &[
    ("archive", OptionSpec::switch("a")),
    ("verbose", OptionSpec::switch("v")),
    ("quiet", OptionSpec::switch("q")),
    ("compress", OptionSpec::switch("z")),
    ("recursive", OptionSpec::switch("r")),
    ("relative", OptionSpec::switch("R")),
    ("update", OptionSpec::switch("u")),
    ("checksum", OptionSpec::switch("c")),
    ("links", OptionSpec::switch("l")),
    ("hard_links", OptionSpec::switch("H")),
    ("perms", OptionSpec::switch("p")),
    ("times", OptionSpec::switch("t")),
    ("group", OptionSpec::switch("g")),
    ("owner", OptionSpec::switch("o")),
    ("devices", OptionSpec::switch("D")),
    ("acls", OptionSpec::switch("A")),
    ("xattrs", OptionSpec::switch("X")),
    ("sparse", OptionSpec::switch("S")),
    ("whole_file", OptionSpec::switch("W")),
    ("one_file_system", OptionSpec::switch("x")),
    ("prune_empty_dirs", OptionSpec::switch("m")),
    ("human_readable", OptionSpec::switch("h")),
    ("itemize_changes", OptionSpec::switch("i")),
    ("backup", OptionSpec::switch("b")),
    ("dry_run", OptionSpec::switch("dry-run")),
    ("delete", OptionSpec::switch("delete")),
    ("delete_after", OptionSpec::switch("delete-after")),
    ("delete_excluded", OptionSpec::switch("delete-excluded")),
    ("remove_source_files", OptionSpec::switch("remove-source-files")),
    ("existing", OptionSpec::switch("existing")),
    ("ignore_existing", OptionSpec::switch("ignore-existing")),
    ("inplace", OptionSpec::switch("inplace")),
    ("append", OptionSpec::switch("append")),
    ("partial", OptionSpec::switch("partial")),
    ("progress", OptionSpec::switch("progress")),
    ("stats", OptionSpec::switch("stats")),
    ("numeric_ids", OptionSpec::switch("numeric-ids")),
    ("rsh", OptionSpec::argument("e")),
    ("rsync_path", OptionSpec::argument("rsync-path")),
    ("exclude_from", OptionSpec::argument("exclude-from")),
    ("include_from", OptionSpec::argument("include-from")),
    ("files_from", OptionSpec::argument("files-from")),
    ("backup_dir", OptionSpec::argument("backup-dir")),
    ("suffix", OptionSpec::argument("suffix")),
    ("partial_dir", OptionSpec::argument("partial-dir")),
    ("temp_dir", OptionSpec::argument("temp-dir")),
    ("bwlimit", OptionSpec::argument("bwlimit")),
    ("timeout", OptionSpec::argument("timeout")),
    ("max_size", OptionSpec::argument("max-size")),
    ("min_size", OptionSpec::argument("min-size")),
    ("max_delete", OptionSpec::argument("max-delete")),
    ("modify_window", OptionSpec::argument("modify-window")),
    ("chown", OptionSpec::argument("chown")),
    ("log_file", OptionSpec::argument("log-file")),
    ("out_format", OptionSpec::argument("out-format")),
    ("password_file", OptionSpec::argument("password-file")),
    ("port", OptionSpec::argument("port")),
    ("exclude", OptionSpec::repeatable("exclude")),
    ("include", OptionSpec::repeatable("include")),
    ("filter", OptionSpec::repeatable("f")),
    ("chmod", OptionSpec::repeatable("chmod")),
    ("compare_dest", OptionSpec::repeatable("compare-dest")),
    ("link_dest", OptionSpec::repeatable("link-dest")),
];

/// The `rsync` file synchronisation tool.
#[derive(Debug, Clone, Copy)]
pub struct Rsync;

impl Tool for Rsync {
    const EXECUTABLE: &'static str = "rsync";

    fn schema() -> Arc<OptionSchema> {
        static SCHEMA: OnceLock<Arc<OptionSchema>> = OnceLock::new();
        Arc::clone(SCHEMA.get_or_init(|| Arc::new(OptionSchema::from_table(OPTIONS))))
    }
}

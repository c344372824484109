//! Command lines for invoking legacy `setup.py` builds.
//!
//! `setup.py` scripts assume they are executed as a file: they consult
//! `sys.argv[0]` and `__file__` to locate themselves and their siblings, so a
//! naive `python -c <code>` invocation breaks them (setuptools' `manifest_maker`,
//! for one, warns about a missing standard file named `-c`). Every command line
//! built here instead runs a small shim that restores file-like execution
//! before handing control to the script.

use std::ffi::OsString;
use std::path::Path;

use indoc::formatdoc;
use itertools::Itertools;
use tracing::debug;

/// Escape a path for embedding in a double-quoted Python string literal.
fn escape_path_for_python(path: &Path) -> String {
    path.to_string_lossy()
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
}

/// Render the Python shim that executes `setup_py` as if it were run directly.
///
/// `sys.argv[0]` and `__file__` are pointed at the real file, so introspection
/// inside the script sees a path rather than `-c`. The source is read through
/// `tokenize.open` where available (it honors PEP 263 encoding declarations),
/// and `\r\n` is normalized to `\n` before compiling, since compiling source
/// with embedded carriage returns is inconsistent across interpreter versions.
fn setup_py_shim(setup_py: &Path) -> String {
    let path = escape_path_for_python(setup_py);
    formatdoc! {r#"
        import sys, setuptools, tokenize
        sys.argv[0] = "{path}"
        __file__ = "{path}"
        f = getattr(tokenize, "open", open)(__file__)
        code = f.read().replace("\r\n", "\n")
        f.close()
        exec(compile(code, __file__, "exec"))
    "#}
}

fn display_args(args: &[OsString]) -> String {
    args.iter().map(|arg| arg.to_string_lossy()).join(" ")
}

/// The common prefix of every shim-wrapped `setup.py` invocation: the
/// interpreter, optionally `-u` for unbuffered output, the `-c <shim>` pair,
/// any global options in the given order, and optionally `--no-user-cfg`.
///
/// Pure over its inputs. Nothing is validated here: an empty or dangling
/// `setup_py` path still yields a well-formed vector, and any failure surfaces
/// when the command is actually run.
pub fn shim_args(
    python_executable: &Path,
    setup_py: &Path,
    global_options: &[OsString],
    no_user_config: bool,
    unbuffered_output: bool,
) -> Vec<OsString> {
    let mut args = vec![python_executable.as_os_str().to_owned()];
    if unbuffered_output {
        args.push("-u".into());
    }
    args.push("-c".into());
    args.push(setup_py_shim(setup_py).into());
    args.extend(global_options.iter().cloned());
    if no_user_config {
        args.push("--no-user-cfg".into());
    }
    args
}

/// The command line for a `setup.py develop` (editable) install.
///
/// Install options always precede the `--prefix` pair, which is only emitted
/// for a non-empty prefix.
pub fn develop_args(
    python_executable: &Path,
    setup_py: &Path,
    global_options: &[OsString],
    install_options: &[OsString],
    no_user_config: bool,
    prefix: Option<&Path>,
) -> Vec<OsString> {
    let mut args = shim_args(
        python_executable,
        setup_py,
        global_options,
        no_user_config,
        false,
    );
    args.push("develop".into());
    args.push("--no-deps".into());
    args.extend(install_options.iter().cloned());
    if let Some(prefix) = prefix.filter(|prefix| !prefix.as_os_str().is_empty()) {
        args.push("--prefix".into());
        args.push(prefix.as_os_str().to_owned());
    }
    debug!("Generated `setup.py develop` command: {}", display_args(&args));
    args
}

/// The command line for a `setup.py egg_info` (metadata-only) run.
pub fn egg_info_args(
    python_executable: &Path,
    setup_py: &Path,
    egg_info_dir: Option<&Path>,
    no_user_config: bool,
) -> Vec<OsString> {
    let mut args = shim_args(python_executable, setup_py, &[], false, false);
    // Applied at this level rather than through the base builder; the two
    // layers handle the toggle independently.
    if no_user_config {
        args.push("--no-user-cfg".into());
    }
    args.push("egg_info".into());
    if let Some(egg_info_dir) = egg_info_dir.filter(|dir| !dir.as_os_str().is_empty()) {
        args.push("--egg-base".into());
        args.push(egg_info_dir.as_os_str().to_owned());
    }
    debug!("Generated `setup.py egg_info` command: {}", display_args(&args));
    args
}

/// The full command line for a `setup.py install`.
///
/// Output is forced unbuffered so installation progress streams through. The
/// record file and the byte-compile decision are required: the generated
/// command is ambiguous without them, so neither has a default. The fixed
/// tail order is `--root`, `--prefix`, the compile flag, `--install-headers`,
/// then the install options.
pub fn install_args(
    python_executable: &Path,
    setup_py: &Path,
    global_options: &[OsString],
    install_options: &[OsString],
    record: &Path,
    root: Option<&Path>,
    prefix: Option<&Path>,
    header_dir: Option<&Path>,
    no_user_config: bool,
    pycompile: bool,
) -> Vec<OsString> {
    let mut args = shim_args(
        python_executable,
        setup_py,
        global_options,
        no_user_config,
        true,
    );
    args.push("install".into());
    args.push("--record".into());
    args.push(record.as_os_str().to_owned());
    args.push("--single-version-externally-managed".into());
    if let Some(root) = root {
        args.push("--root".into());
        args.push(root.as_os_str().to_owned());
    }
    if let Some(prefix) = prefix {
        args.push("--prefix".into());
        args.push(prefix.as_os_str().to_owned());
    }
    args.push(if pycompile {
        "--compile".into()
    } else {
        "--no-compile".into()
    });
    if let Some(header_dir) = header_dir.filter(|dir| !dir.as_os_str().is_empty()) {
        args.push("--install-headers".into());
        args.push(header_dir.as_os_str().to_owned());
    }
    args.extend(install_options.iter().cloned());
    debug!("Generated `setup.py install` command: {}", display_args(&args));
    args
}

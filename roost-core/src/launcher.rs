//! Start-up helper scripts that launch the installed executable from its
//! install root.

use std::path::Path;

/// Script dialect of a generated launcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LauncherStyle {
    /// POSIX `sh` script, referenced from a `@reboot` cron entry.
    Shell,
    /// Windows batch file, dropped into the Startup folder.
    Cmd,
}

impl LauncherStyle {
    /// Render a script that starts `exe` with `work_dir` as working directory.
    pub fn render(self, exe: &Path, work_dir: &Path) -> String {
        match self {
            Self::Shell => render_shell(exe, work_dir),
            Self::Cmd => render_cmd(exe, work_dir),
        }
    }
}

fn render_shell(exe: &Path, work_dir: &Path) -> String {
    format!(
        "#!/bin/sh\n# Generated by roost. Removed by `roost --uninstall`.\ncd {dir} || exit 1\nexec {exe}\n",
        dir = sh_quote(&work_dir.display().to_string()),
        exe = sh_quote(&exe.display().to_string()),
    )
}

fn render_cmd(exe: &Path, work_dir: &Path) -> String {
    // `start` treats the first quoted argument as the window title, hence the empty "".
    format!(
        "@echo off\r\nrem Generated by roost. Removed by `roost --uninstall`.\r\nstart \"\" /D \"{dir}\" \"{exe}\"\r\n",
        dir = work_dir.display(),
        exe = exe.display(),
    )
}

/// Single-quote `s` for `sh`, escaping embedded single quotes.
pub fn sh_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_launcher_changes_dir_then_execs() {
        let script = LauncherStyle::Shell.render(
            Path::new("/Users/t/Library/Application Support/remote/remote"),
            Path::new("/Users/t/Library/Application Support/remote"),
        );
        assert!(script.starts_with("#!/bin/sh\n"));
        assert!(script.contains("cd '/Users/t/Library/Application Support/remote' || exit 1"));
        assert!(script.contains("exec '/Users/t/Library/Application Support/remote/remote'"));
    }

    #[test]
    fn cmd_launcher_uses_crlf_and_start() {
        let script = LauncherStyle::Cmd.render(
            Path::new(r"C:\Users\t\AppData\Local\remote\remote.exe"),
            Path::new(r"C:\Users\t\AppData\Local\remote"),
        );
        assert!(script.starts_with("@echo off\r\n"));
        assert!(script.contains(r#"start "" /D "C:\Users\t\AppData\Local\remote""#));
        assert!(!script.replace("\r\n", "").contains('\n'));
    }

    #[test]
    fn sh_quote_escapes_single_quotes() {
        assert_eq!(sh_quote("it's"), r"'it'\''s'");
    }
}

//! Landlock enforcement tests
//!
//! These tests verify that rulesets built here are enforced by the kernel.
//! They do NOT require root (Landlock is designed for unprivileged use).
//! They DO require Linux 5.13+ with Landlock support.
//!
//! Each test confines a forked child, never the test process itself, and
//! skips gracefully on systems without Landlock. Rulesets are built before
//! the fork so the child of this multi-threaded harness never allocates; it
//! only commits and issues raw syscalls before `_exit`.

use sandbox_landlock::{AccessFs, Kernel, Ruleset, Syscalls};
use std::ffi::CString;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

/// Check if landlock is available on this system.
/// Tests that need it will skip if not available.
fn require_landlock() -> bool {
    sandbox_landlock::enabled(&Syscalls)
}

/// Fork, run `child` in the child process and return its exit code.
fn run_in_child(child: impl FnOnce() -> i32) -> i32 {
    unsafe {
        let pid = libc::fork();
        assert!(pid >= 0, "fork failed: {}", std::io::Error::last_os_error());

        if pid == 0 {
            let code = child();
            libc::_exit(code);
        }

        let mut status: i32 = 0;
        libc::waitpid(pid, &mut status, 0);
        assert!(libc::WIFEXITED(status), "Child should exit normally");
        libc::WEXITSTATUS(status)
    }
}

/// Build a ruleset in the parent, ready for the child to commit.
fn ruleset(read_only: &[&Path], read_write: &[&Path]) -> Ruleset<'static, Syscalls> {
    let abi = Syscalls.abi_version();
    let mut ruleset = Ruleset::create(&Syscalls).expect("failed to create ruleset");
    for path in read_only {
        ruleset
            .allow(path, AccessFs::read_only())
            .expect("failed to add read-only rule");
    }
    for path in read_write {
        ruleset
            .allow(path, AccessFs::all(abi))
            .expect("failed to add read-write rule");
    }
    ruleset
}

fn c_path(path: &Path) -> CString {
    CString::new(path.as_os_str().as_bytes()).unwrap()
}

/// Verify that the probe and `enabled` agree.
#[test]
fn landlock_availability_check_is_safe() {
    let abi = Syscalls.abi_version();
    assert_eq!(require_landlock(), abi.version() > 0);
}

/// Verify that a confined child cannot read outside its grants.
#[test]
fn landlock_restricts_file_access() {
    if !require_landlock() {
        eprintln!("SKIP: Landlock not available on this kernel");
        return;
    }

    let allowed = tempfile::tempdir().unwrap();
    let denied = tempfile::tempdir().unwrap();
    let secret = denied.path().join("secret");
    std::fs::write(&secret, b"hidden").unwrap();
    let secret = c_path(&secret);

    let rules = ruleset(&[allowed.path()], &[]);
    let code = run_in_child(|| {
        if rules.commit().is_err() {
            return 99;
        }
        unsafe {
            let fd = libc::open(secret.as_ptr(), libc::O_RDONLY);
            if fd >= 0 {
                libc::close(fd);
                return 1;
            }
            if *libc::__errno_location() == libc::EACCES { 0 } else { 2 }
        }
    });

    assert_eq!(code, 0, "Landlock should deny reads outside grants (exit={code})");
}

/// Verify that landlock still allows access to permitted paths.
#[test]
fn landlock_allows_permitted_paths() {
    if !require_landlock() {
        eprintln!("SKIP: Landlock not available on this kernel");
        return;
    }

    let allowed = tempfile::tempdir().unwrap();
    let file = allowed.path().join("data");
    std::fs::write(&file, b"test data").unwrap();
    let file = c_path(&file);

    let rules = ruleset(&[allowed.path()], &[]);
    let code = run_in_child(|| {
        if rules.commit().is_err() {
            return 99;
        }
        unsafe {
            let fd = libc::open(file.as_ptr(), libc::O_RDONLY);
            if fd < 0 {
                return 1;
            }
            libc::close(fd);
            0
        }
    });

    assert_eq!(code, 0, "Landlock should allow access to permitted paths");
}

/// Verify that read-only grants do not allow creating files.
#[test]
fn landlock_restricts_write_access() {
    if !require_landlock() {
        eprintln!("SKIP: Landlock not available on this kernel");
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    let target = c_path(&dir.path().join("new-file"));

    let rules = ruleset(&[dir.path()], &[]);
    let code = run_in_child(|| {
        if rules.commit().is_err() {
            return 99;
        }
        unsafe {
            let fd = libc::open(
                target.as_ptr(),
                libc::O_WRONLY | libc::O_CREAT | libc::O_TRUNC,
                0o644,
            );
            if fd < 0 {
                return 0;
            }
            libc::close(fd);
            1
        }
    });

    assert_eq!(code, 0, "Landlock should deny writes under read-only grants");
}

/// Verify that read-write grants allow creating files.
#[test]
fn landlock_allows_write_under_read_write_grant() {
    if !require_landlock() {
        eprintln!("SKIP: Landlock not available on this kernel");
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    let target = c_path(&dir.path().join("new-file"));

    let rules = ruleset(&[], &[dir.path()]);
    let code = run_in_child(|| {
        if rules.commit().is_err() {
            return 99;
        }
        unsafe {
            let fd = libc::open(
                target.as_ptr(),
                libc::O_WRONLY | libc::O_CREAT | libc::O_TRUNC,
                0o644,
            );
            if fd < 0 {
                return 1;
            }
            libc::close(fd);
            0
        }
    });

    assert_eq!(code, 0, "Landlock should allow writes under read-write grants");
}

/// Verify that grants for missing paths are skipped, not fatal.
#[test]
fn landlock_skips_missing_paths() {
    if !require_landlock() {
        eprintln!("SKIP: Landlock not available on this kernel");
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing");

    let rules = ruleset(&[missing.as_path()], &[]);
    assert_eq!(rules.rule_count(), 0);
    let code = run_in_child(|| if rules.commit().is_ok() { 0 } else { 1 });

    assert_eq!(code, 0, "missing paths should not prevent confinement");
}

//! Policy assembly
//!
//! Turns the parsed path buckets plus a fixed baseline into the ordered list
//! of grants handed to the ruleset. Grants are additive, so order only
//! matters for readable diagnostics.

use sandbox_landlock::{Abi, AccessFs};
use std::path::{Path, PathBuf};

use crate::cli::ParsedArguments;

// Basically all programs need to load libc and other system libraries.
const SYSTEM_READ_ONLY: [&str; 6] = ["/usr", "/bin", "/var", "/lib", "/lib32", "/lib64"];
// Scratch space every program may use.
const SYSTEM_READ_WRITE: [&str; 1] = ["/tmp"];

/// Grants applied to every confined program before the user's own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Baseline {
    pub read_only: Vec<PathBuf>,
    pub read_write: Vec<PathBuf>,
}

impl Baseline {
    /// System library and binary directories readable, `/tmp` writable.
    pub fn system() -> Self {
        Self {
            read_only: SYSTEM_READ_ONLY.iter().map(PathBuf::from).collect(),
            read_write: SYSTEM_READ_WRITE.iter().map(PathBuf::from).collect(),
        }
    }
}

/// One path and the rights granted beneath it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
    pub path: PathBuf,
    pub access: AccessFs,
}

impl Grant {
    fn new(path: &Path, access: AccessFs) -> Self {
        Self {
            path: path.to_path_buf(),
            access,
        }
    }
}

/// Every grant for `args`, in application order.
pub fn plan(baseline: &Baseline, args: &ParsedArguments, abi: Abi) -> Vec<Grant> {
    let read_only = AccessFs::read_only();
    let all = AccessFs::all(abi);
    let all_dir = AccessFs::all_dir(abi);

    let buckets: [(&[PathBuf], AccessFs); 6] = [
        (baseline.read_only.as_slice(), read_only),
        (baseline.read_write.as_slice(), all),
        (args.ro_dirs.as_slice(), all_dir & read_only),
        (args.rw_dirs.as_slice(), all_dir),
        (args.ro_paths.as_slice(), read_only),
        (args.rw_paths.as_slice(), all),
    ];

    buckets
        .into_iter()
        .flat_map(|(paths, access)| paths.iter().map(move |path| Grant::new(path, access)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> ParsedArguments {
        ParsedArguments {
            ro_paths: vec![PathBuf::from("/ro-path")],
            rw_paths: vec![PathBuf::from("/rw-path")],
            ro_dirs: vec![PathBuf::from("/ro-dir")],
            rw_dirs: vec![PathBuf::from("/rw-dir")],
            ..Default::default()
        }
    }

    #[test]
    fn system_baseline_covers_libraries_and_tmp() {
        let baseline = Baseline::system();
        assert!(baseline.read_only.contains(&PathBuf::from("/usr")));
        assert!(baseline.read_only.contains(&PathBuf::from("/lib64")));
        assert_eq!(baseline.read_write, vec![PathBuf::from("/tmp")]);
    }

    #[test]
    fn grants_follow_fixed_order() {
        let baseline = Baseline {
            read_only: vec![PathBuf::from("/base-ro")],
            read_write: vec![PathBuf::from("/base-rw")],
        };
        let order: Vec<PathBuf> = plan(&baseline, &args(), Abi::V1)
            .into_iter()
            .map(|grant| grant.path)
            .collect();
        let expected: Vec<PathBuf> = [
            "/base-ro", "/base-rw", "/ro-dir", "/rw-dir", "/ro-path", "/rw-path",
        ]
        .iter()
        .map(PathBuf::from)
        .collect();
        assert_eq!(order, expected);
    }

    #[test]
    fn masks_per_bucket() {
        let abi = Abi::V2;
        let grants = plan(&Baseline::default(), &args(), abi);
        let access: Vec<AccessFs> = grants.iter().map(|grant| grant.access).collect();
        assert_eq!(
            access,
            vec![
                AccessFs::READ_DIR,
                AccessFs::all_dir(abi),
                AccessFs::read_only(),
                AccessFs::all(abi),
            ]
        );
    }

    #[test]
    fn masks_follow_abi() {
        let grants = plan(&Baseline::default(), &args(), Abi::V1);
        assert!(grants.iter().all(|g| !g.access.contains(AccessFs::REFER)));

        let grants = plan(&Baseline::default(), &args(), Abi::V2);
        assert!(grants[1].access.contains(AccessFs::REFER));
    }

    #[test]
    fn empty_inputs_yield_no_grants() {
        assert!(plan(&Baseline::default(), &ParsedArguments::default(), Abi::V1).is_empty());
    }
}

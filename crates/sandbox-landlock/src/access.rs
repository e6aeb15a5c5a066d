//! Filesystem access rights
//!
//! Bit values mirror `LANDLOCK_ACCESS_FS_*` from `<linux/landlock.h>`.
//! Presets that depend on kernel features take the probed [`Abi`] so the
//! same binary hands older kernels only the bits they understand.

use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign};

use crate::abi::Abi;

/// A set of Landlock filesystem access rights.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AccessFs(u64);

impl AccessFs {
    pub const EXECUTE: AccessFs = AccessFs(1 << 0);
    pub const WRITE_FILE: AccessFs = AccessFs(1 << 1);
    pub const READ_FILE: AccessFs = AccessFs(1 << 2);
    pub const READ_DIR: AccessFs = AccessFs(1 << 3);
    pub const REMOVE_DIR: AccessFs = AccessFs(1 << 4);
    pub const REMOVE_FILE: AccessFs = AccessFs(1 << 5);
    pub const MAKE_CHAR: AccessFs = AccessFs(1 << 6);
    pub const MAKE_DIR: AccessFs = AccessFs(1 << 7);
    pub const MAKE_REG: AccessFs = AccessFs(1 << 8);
    pub const MAKE_SOCK: AccessFs = AccessFs(1 << 9);
    pub const MAKE_FIFO: AccessFs = AccessFs(1 << 10);
    pub const MAKE_BLOCK: AccessFs = AccessFs(1 << 11);
    pub const MAKE_SYM: AccessFs = AccessFs(1 << 12);
    /// Link or rename a file from or to a different directory (ABI v2).
    pub const REFER: AccessFs = AccessFs(1 << 13);

    const NAMES: [(AccessFs, &'static str); 14] = [
        (Self::EXECUTE, "execute"),
        (Self::WRITE_FILE, "write_file"),
        (Self::READ_FILE, "read_file"),
        (Self::READ_DIR, "read_dir"),
        (Self::REMOVE_DIR, "remove_dir"),
        (Self::REMOVE_FILE, "remove_file"),
        (Self::MAKE_CHAR, "make_char"),
        (Self::MAKE_DIR, "make_dir"),
        (Self::MAKE_REG, "make_reg"),
        (Self::MAKE_SOCK, "make_sock"),
        (Self::MAKE_FIFO, "make_fifo"),
        (Self::MAKE_BLOCK, "make_block"),
        (Self::MAKE_SYM, "make_sym"),
        (Self::REFER, "refer"),
    ];

    pub const fn empty() -> Self {
        AccessFs(0)
    }

    pub const fn from_bits(bits: u64) -> Self {
        AccessFs(bits)
    }

    pub const fn bits(self) -> u64 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: AccessFs) -> bool {
        self.0 & other.0 == other.0
    }

    /// Execute, read files and list directories.
    pub fn read_only() -> Self {
        Self::EXECUTE | Self::READ_FILE | Self::READ_DIR
    }

    /// Every right that applies to regular files.
    pub fn all_file() -> Self {
        Self::EXECUTE | Self::WRITE_FILE | Self::READ_FILE
    }

    /// Every right that only makes sense on directories.
    pub fn all_dir(abi: Abi) -> Self {
        let mut access = Self::READ_DIR
            | Self::REMOVE_DIR
            | Self::REMOVE_FILE
            | Self::MAKE_CHAR
            | Self::MAKE_DIR
            | Self::MAKE_REG
            | Self::MAKE_SOCK
            | Self::MAKE_FIFO
            | Self::MAKE_BLOCK
            | Self::MAKE_SYM;
        if abi.supports_refer() {
            access |= Self::REFER;
        }
        access
    }

    pub fn all(abi: Abi) -> Self {
        Self::all_file() | Self::all_dir(abi)
    }

    /// Rights a ruleset must declare as handled before any rule may grant them.
    pub fn handled(abi: Abi) -> Self {
        let mut access = Self::all(abi);
        if abi.supports_refer() {
            access |= Self::REFER;
        }
        access
    }
}

impl BitOr for AccessFs {
    type Output = AccessFs;

    fn bitor(self, rhs: AccessFs) -> AccessFs {
        AccessFs(self.0 | rhs.0)
    }
}

impl BitOrAssign for AccessFs {
    fn bitor_assign(&mut self, rhs: AccessFs) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for AccessFs {
    type Output = AccessFs;

    fn bitand(self, rhs: AccessFs) -> AccessFs {
        AccessFs(self.0 & rhs.0)
    }
}

impl BitAndAssign for AccessFs {
    fn bitand_assign(&mut self, rhs: AccessFs) {
        self.0 &= rhs.0;
    }
}

impl fmt::Display for AccessFs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let mut first = true;
        for (flag, name) in Self::NAMES {
            if self.contains(flag) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        let unknown = self.0 & !Self::NAMES.iter().fold(0, |acc, (flag, _)| acc | flag.0);
        if unknown != 0 {
            if !first {
                f.write_str("|")?;
            }
            write!(f, "{unknown:#x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for AccessFs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccessFs({self})")
    }
}

//! 筋（File）

/// 筋（1筋〜9筋）。内部値は 0-8
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum File {
    File1 = 0,
    File2 = 1,
    File3 = 2,
    File4 = 3,
    File5 = 4,
    File6 = 5,
    File7 = 6,
    File8 = 7,
    File9 = 8,
}

impl File {
    /// 筋の数
    pub const NUM: usize = 9;

    /// 1筋から9筋の順
    pub const ALL: [File; 9] = [
        File::File1,
        File::File2,
        File::File3,
        File::File4,
        File::File5,
        File::File6,
        File::File7,
        File::File8,
        File::File9,
    ];

    /// 9筋から1筋の順（盤面表示・SFENの並び）
    pub const ALL_DESC: [File; 9] = [
        File::File9,
        File::File8,
        File::File7,
        File::File6,
        File::File5,
        File::File4,
        File::File3,
        File::File2,
        File::File1,
    ];

    #[inline]
    pub const fn from_u8(n: u8) -> Option<File> {
        if n < 9 {
            // SAFETY: n < 9
            Some(unsafe { std::mem::transmute::<u8, File>(n) })
        } else {
            None
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// USI形式の文字（'1'-'9'）
    #[inline]
    pub const fn to_usi_char(self) -> char {
        (b'1' + self as u8) as char
    }

    #[inline]
    pub const fn from_usi_char(c: char) -> Option<File> {
        if !c.is_ascii() {
            return None;
        }
        File::from_u8((c as u8).wrapping_sub(b'1'))
    }
}

use derive_more::IsVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IsVariant)]
pub enum FileType {
    BlockDevice,
    CharDevice,
    Directory,
    Fifo,
    Symlink,
    Regular,
    Socket,
    Other,
}

use FileType::*;

impl FileType {
    #[cfg(unix)]
    #[inline(always)]
    pub(crate) const fn from_stat_mode(st_mode: libc::mode_t) -> FileType {
        match st_mode & libc::S_IFMT {
            libc::S_IFBLK => BlockDevice,
            libc::S_IFCHR => CharDevice,
            libc::S_IFDIR => Directory,
            libc::S_IFIFO => Fifo,
            libc::S_IFLNK => Symlink,
            libc::S_IFREG => Regular,
            libc::S_IFSOCK => Socket,
            _ => Other,
        }
    }

    pub(crate) fn from_std(file_type: std::fs::FileType) -> FileType {
        #[cfg(unix)]
        {
            use std::os::unix::fs::FileTypeExt;

            if file_type.is_block_device() {
                return BlockDevice;
            } else if file_type.is_char_device() {
                return CharDevice;
            } else if file_type.is_fifo() {
                return Fifo;
            } else if file_type.is_socket() {
                return Socket;
            }
        }

        if file_type.is_symlink() {
            Symlink
        } else if file_type.is_dir() {
            Directory
        } else if file_type.is_file() {
            Regular
        } else {
            Other
        }
    }
}

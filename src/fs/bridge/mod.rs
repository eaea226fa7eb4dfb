//! Runs the synchronous primitives on a tokio runtime.

use std::panic;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::JoinError;

use crate::fs::{
    Backend, ErrorKind, File, FileStream, FsError, Mode, OpenExcl, Result, Stats, SysFs,
};

mod lock;

pub(crate) use lock::*;

/// The asynchronous counterpart of [`Backend`] and [`FileStream`].
///
/// Every operation is dispatched with [`spawn_blocking`](Handle::spawn_blocking) onto the runtime
/// behind the [`Handle`] given at construction; no threads of its own are started.
///
/// Streams are shared as `Arc<FileStream>`. Operations that read or move the shared cursor
/// ([`position`](AsyncFs::position), [`set_position`](AsyncFs::set_position),
/// [`size`](AsyncFs::size), [`set_size`](AsyncFs::set_size), [`read`](AsyncFs::read),
/// [`write`](AsyncFs::write), [`sync`](AsyncFs::sync) and [`close`](AsyncFs::close)) hold the
/// stream's lock from before the native call starts until after it returns, so they never
/// interleave. The lock is created the first time a stream is used here. Positional operations do
/// not take it. Waiters are not served in any particular order.
///
/// Dropping one of the returned futures cancels the wait for the lock, or the wait for the result.
/// A native call that has already started always runs to completion and releases the lock
/// afterwards. [`close`](AsyncFs::close) cannot be cancelled at all once polled.
#[derive(Debug, Clone)]
pub struct AsyncFs {
    handle: Handle,
    fs: Arc<dyn Backend>,
}

impl AsyncFs {
    pub fn new(handle: Handle) -> AsyncFs {
        AsyncFs::with_backend(handle, Arc::new(SysFs::new()))
    }

    pub fn with_backend(handle: Handle, fs: Arc<dyn Backend>) -> AsyncFs {
        AsyncFs { handle, fs }
    }

    /// Dispatches onto the runtime the caller is running on.
    ///
    /// # Panics
    /// Panics if called outside of a tokio runtime.
    pub fn current() -> AsyncFs {
        AsyncFs::new(Handle::current())
    }

    pub fn try_current() -> Option<AsyncFs> {
        Handle::try_current().ok().map(AsyncFs::new)
    }

    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    async fn run<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce() -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        join(self.handle.spawn_blocking(op).await)
    }

    async fn with_fs<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&dyn Backend) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let fs = Arc::clone(&self.fs);
        self.run(move || op(fs.as_ref())).await
    }

    async fn locked<T, F>(&self, stream: &Arc<FileStream>, op: F) -> Result<T>
    where
        F: FnOnce(&FileStream) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let guard = stream.lock.get_or_init().lock_owned().await;
        let stream = Arc::clone(stream);
        self.run(move || {
            let _guard = guard;
            op(&stream)
        })
        .await
    }

    async fn unlocked<T, F>(&self, stream: &Arc<FileStream>, op: F) -> Result<T>
    where
        F: FnOnce(&FileStream) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let stream = Arc::clone(stream);
        self.run(move || op(&stream)).await
    }

    pub async fn exists(&self, file: &File) -> Result<bool> {
        let file = file.clone();
        self.with_fs(move |fs| fs.exists(&file)).await
    }

    pub async fn stat(&self, file: &File) -> Result<Stats> {
        let file = file.clone();
        self.with_fs(move |fs| fs.stat(&file)).await
    }

    pub async fn lstat(&self, file: &File) -> Result<Stats> {
        let file = file.clone();
        self.with_fs(move |fs| fs.lstat(&file)).await
    }

    pub async fn chmod(&self, file: &File, mode: Mode, must_exist: bool) -> Result<()> {
        let file = file.clone();
        self.with_fs(move |fs| fs.chmod(&file, mode, must_exist)).await
    }

    pub async fn delete(
        &self,
        file: &File,
        ignore_read_only: bool,
        must_exist: bool,
    ) -> Result<()> {
        let file = file.clone();
        self.with_fs(move |fs| fs.delete(&file, ignore_read_only, must_exist)).await
    }

    pub async fn mkdir(&self, dir: &File, mode: Mode, must_create: bool) -> Result<()> {
        let dir = dir.clone();
        self.with_fs(move |fs| fs.mkdir(&dir, mode, must_create)).await
    }

    /// See [`Backend::mkdirs`]. Once started, a rollback runs to completion even if this future
    /// is dropped.
    pub async fn mkdirs(&self, dir: &File, mode: Mode, must_create: bool) -> Result<()> {
        let dir = dir.clone();
        self.with_fs(move |fs| fs.mkdirs(&dir, mode, must_create)).await
    }

    pub async fn absolute_path(&self, file: &File) -> Result<File> {
        let file = file.clone();
        self.with_fs(move |fs| fs.absolute_path(&file)).await
    }

    pub async fn canonical_path(&self, file: &File) -> Result<File> {
        let file = file.clone();
        self.with_fs(move |fs| fs.canonical_path(&file)).await
    }

    pub async fn open_read(&self, file: &File) -> Result<Arc<FileStream>> {
        let file = file.clone();
        self.with_fs(move |fs| fs.open_read(&file).map(Arc::new)).await
    }

    pub async fn open_write(
        &self,
        file: &File,
        excl: OpenExcl,
        appending: bool,
    ) -> Result<Arc<FileStream>> {
        let file = file.clone();
        self.with_fs(move |fs| fs.open_write(&file, excl, appending).map(Arc::new))
            .await
    }

    pub async fn open_read_write(&self, file: &File, excl: OpenExcl) -> Result<Arc<FileStream>> {
        let file = file.clone();
        self.with_fs(move |fs| fs.open_read_write(&file, excl).map(Arc::new))
            .await
    }

    pub async fn read_bytes(&self, file: &File) -> Result<Vec<u8>> {
        let file = file.clone();
        self.with_fs(move |fs| fs.read_bytes(&file)).await
    }

    pub async fn read_utf8(&self, file: &File) -> Result<String> {
        let file = file.clone();
        self.with_fs(move |fs| fs.read_utf8(&file)).await
    }

    pub async fn write_bytes(&self, file: &File, excl: OpenExcl, data: &[u8]) -> Result<()> {
        let (file, data) = (file.clone(), data.to_vec());
        self.with_fs(move |fs| fs.write_bytes(&file, excl, &data)).await
    }

    pub async fn write_utf8(&self, file: &File, excl: OpenExcl, text: &str) -> Result<()> {
        self.write_bytes(file, excl, text.as_bytes()).await
    }

    pub async fn append_bytes(&self, file: &File, excl: OpenExcl, data: &[u8]) -> Result<()> {
        let (file, data) = (file.clone(), data.to_vec());
        self.with_fs(move |fs| fs.append_bytes(&file, excl, &data)).await
    }

    pub async fn append_utf8(&self, file: &File, excl: OpenExcl, text: &str) -> Result<()> {
        self.append_bytes(file, excl, text.as_bytes()).await
    }

    pub async fn position(&self, stream: &Arc<FileStream>) -> Result<u64> {
        self.locked(stream, |stream| stream.position()).await
    }

    pub async fn set_position(&self, stream: &Arc<FileStream>, pos: u64) -> Result<()> {
        self.locked(stream, move |stream| stream.set_position(pos)).await
    }

    pub async fn size(&self, stream: &Arc<FileStream>) -> Result<u64> {
        self.locked(stream, |stream| stream.size()).await
    }

    pub async fn set_size(&self, stream: &Arc<FileStream>, size: u64) -> Result<()> {
        self.locked(stream, move |stream| stream.set_size(size)).await
    }

    /// See [`FileStream::read`].
    pub async fn read(&self, stream: &Arc<FileStream>, buf: &mut [u8]) -> Result<Option<usize>> {
        let len = buf.len();
        let (count, data) = self
            .locked(stream, move |stream| {
                let mut data = vec![0; len];
                let count = stream.read(&mut data)?;
                Ok((count, data))
            })
            .await?;

        if let Some(count) = count {
            buf[..count].copy_from_slice(&data[..count]);
        }
        Ok(count)
    }

    /// See [`FileStream::read_at`]. Does not wait for the stream's lock.
    pub async fn read_at(
        &self,
        stream: &Arc<FileStream>,
        buf: &mut [u8],
        pos: u64,
    ) -> Result<Option<usize>> {
        let len = buf.len();
        let (count, data) = self
            .unlocked(stream, move |stream| {
                let mut data = vec![0; len];
                let count = stream.read_at(&mut data, pos)?;
                Ok((count, data))
            })
            .await?;

        if let Some(count) = count {
            buf[..count].copy_from_slice(&data[..count]);
        }
        Ok(count)
    }

    pub async fn write(&self, stream: &Arc<FileStream>, data: &[u8]) -> Result<()> {
        let data = data.to_vec();
        self.locked(stream, move |stream| stream.write(&data)).await
    }

    /// See [`FileStream::write_at`]. Does not wait for the stream's lock.
    pub async fn write_at(&self, stream: &Arc<FileStream>, data: &[u8], pos: u64) -> Result<()> {
        let data = data.to_vec();
        self.unlocked(stream, move |stream| stream.write_at(&data, pos)).await
    }

    pub async fn sync(&self, stream: &Arc<FileStream>, meta: bool) -> Result<()> {
        self.locked(stream, move |stream| stream.sync(meta)).await
    }

    /// See [`FileStream::close`].
    ///
    /// The close runs as its own task, so dropping this future does not stop it. A stream that was
    /// never used asynchronously has no lock to wait for and is closed straight away.
    pub async fn close(&self, stream: &Arc<FileStream>) -> Result<()> {
        let stream = Arc::clone(stream);
        let task = self.handle.spawn(async move {
            let _guard = match stream.lock.get() {
                Some(lock) => Some(lock.lock_owned().await),
                None => None,
            };
            join(tokio::task::spawn_blocking(move || stream.close()).await)
        });
        join(task.await)
    }
}

fn join<T>(joined: std::result::Result<Result<T>, JoinError>) -> Result<T> {
    match joined {
        Ok(result) => result,
        Err(error) if error.is_panic() => panic::resume_unwind(error.into_panic()),
        Err(_) => Err(FsError::new(ErrorKind::Io).with_reason("blocking task was cancelled")),
    }
}

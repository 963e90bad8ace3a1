//! Filesystem-backed storage

use crate::data_structures::BytesStream;
use crate::dto::{
    AbortMultipartUploadOutput, AbortMultipartUploadRequest, Bucket, ByteStream,
    CompleteMultipartUploadOutput, CompleteMultipartUploadRequest, CreateBucketOutput,
    CreateBucketRequest, CreateMultipartUploadOutput, CreateMultipartUploadRequest,
    DeleteBucketOutput, DeleteBucketRequest, DeleteObjectOutput, DeleteObjectRequest,
    DeleteObjectsOutput, DeleteObjectsRequest, DeletedObject, GetObjectOutput, GetObjectRequest,
    HeadBucketOutput, HeadBucketRequest, HeadObjectOutput, HeadObjectRequest, ListBucketsOutput,
    ListBucketsRequest, ListObjectsV2Output, ListObjectsV2Request, Object, PutObjectOutput,
    PutObjectRequest, UploadPartOutput, UploadPartRequest,
};
use crate::errors::{S3Error, S3Result};
use crate::limits;
use crate::path::S3Path;
use crate::storage::S3Storage;
use crate::utils::{crypto, time};

use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use async_fs::File;
use async_trait::async_trait;
use futures::io::{AsyncReadExt, AsyncSeekExt, AsyncWrite, AsyncWriteExt, BufWriter};
use futures::stream::{Stream, StreamExt, TryStreamExt};
use hyper::body::Bytes;
use md5::{Digest, Md5};
use path_absolutize::Absolutize;
use tracing::debug;
use uuid::Uuid;

/// name of the reserved multipart staging directory
const UPLOADS_DIR: &str = ".uploads";

/// name of the upload metadata record
const UPLOAD_META_FILE: &str = ".meta";

/// buffer size of streaming file reads
const READ_BUF_SIZE: usize = 64 * 1024;

/// A S3 storage implementation based on the file system
#[derive(Debug)]
pub struct FileSystem {
    /// root path
    root: PathBuf,
}

impl FileSystem {
    /// Constructs a file system storage located at `root`
    ///
    /// The directory is created if missing.
    /// # Errors
    /// Returns an `Err` if the root directory is unusable
    pub fn new(root: impl AsRef<Path>) -> io::Result<Self> {
        std::fs::create_dir_all(root.as_ref())?;
        let root = std::env::current_dir()?.join(root).canonicalize()?;
        Ok(Self { root })
    }

    /// resolve bucket path under the virtual root
    fn get_bucket_path(&self, bucket: &str) -> io::Result<PathBuf> {
        let dir = Path::new(&bucket);
        let ans = dir.absolutize_virtually(&self.root)?.into();
        Ok(ans)
    }

    /// resolve object path under the virtual root
    ///
    /// Keys with `.`/`..` segments or absolute prefixes are rejected before
    /// any filesystem access.
    fn get_object_path(&self, bucket: &str, key: &str) -> S3Result<PathBuf> {
        if !S3Path::check_key_containment(key) {
            return Err(code_error!(
                InvalidKey,
                "The specified key must not escape its bucket."
            ));
        }
        let file_path = Path::new(&bucket).join(key);
        let ans = trace_try!(file_path.absolutize_virtually(&self.root)).into();
        Ok(ans)
    }

    /// resolve the staging directory of a multipart upload
    ///
    /// Upload ids are 32 lowercase hex characters; anything else does not
    /// name an upload.
    fn get_upload_path(&self, upload_id: &str) -> S3Result<PathBuf> {
        let is_upload_id = upload_id.len() == 32
            && upload_id
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if !is_upload_id {
            return Err(no_such_upload());
        }
        Ok(self.root.join(UPLOADS_DIR).join(upload_id))
    }

    /// calculate the md5 checksum of a file
    async fn get_md5_sum(&self, path: &Path) -> io::Result<String> {
        let mut file = File::open(path).await?;
        let mut buf = vec![0; READ_BUF_SIZE];
        let mut md5_hash = Md5::new();
        loop {
            let nread = file.read(&mut buf).await?;
            if nread == 0 {
                break;
            }
            md5_hash.update(&buf[..nread]);
        }
        Ok(crypto::to_hex_string(md5_hash.finalize()))
    }

    /// write a stream to `dest` atomically (temp sibling + rename)
    ///
    /// Returns the byte count and the md5 checksum of the written data.
    async fn write_atomic<S>(&self, dest: &Path, stream: S) -> io::Result<(usize, String)>
    where
        S: Stream<Item = io::Result<Bytes>> + Send + Unpin,
    {
        let parent = dest.parent().unwrap_or(&self.root);
        let tmp_path = parent.join(format!(".{}.tmp", Uuid::new_v4().simple()));

        let mut md5_hash = Md5::new();
        let stream = stream.inspect_ok(|bytes| md5_hash.update(bytes.as_ref()));

        let file = File::create(&tmp_path).await?;
        let mut writer = BufWriter::new(file);

        let size = match copy_bytes(stream, &mut writer).await {
            Ok(size) => size,
            Err(e) => {
                drop(writer);
                let _ = async_fs::remove_file(&tmp_path).await;
                return Err(e);
            }
        };
        writer.close().await?;

        async_fs::rename(&tmp_path, dest).await?;

        Ok((size, crypto::to_hex_string(md5_hash.finalize())))
    }

    /// collect `(key, size, mtime)` of every object under a bucket,
    /// sorted by key
    async fn collect_objects(
        &self,
        bucket_path: &Path,
    ) -> io::Result<Vec<(String, u64, SystemTime)>> {
        let mut objects = Vec::new();
        let mut dir_queue = VecDeque::new();
        dir_queue.push_back(bucket_path.to_owned());

        while let Some(dir) = dir_queue.pop_front() {
            let mut entries = async_fs::read_dir(dir).await?;
            while let Some(entry) = entries.next().await {
                let entry = entry?;
                let file_type = entry.file_type().await?;
                if file_type.is_dir() {
                    dir_queue.push_back(entry.path());
                    continue;
                }

                let file_name = entry.file_name();
                let name = file_name.to_string_lossy();
                // skip in-flight temp files
                if name.starts_with('.') && name.ends_with(".tmp") {
                    continue;
                }

                let file_path = entry.path();
                let key = file_path
                    .strip_prefix(bucket_path)
                    .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?
                    .to_string_lossy()
                    .into_owned();

                let metadata = entry.metadata().await?;
                objects.push((key, metadata.len(), metadata.modified()?));
            }
        }

        objects.sort_by(|lhs, rhs| lhs.0.cmp(&rhs.0));
        Ok(objects)
    }
}

/// copy bytes from a stream to a writer
async fn copy_bytes<S, W>(mut stream: S, writer: &mut W) -> io::Result<usize>
where
    S: Stream<Item = io::Result<Bytes>> + Send + Unpin,
    W: AsyncWrite + Send + Unpin,
{
    let mut nwrite: usize = 0;
    while let Some(bytes) = stream.next().await {
        let bytes = bytes?;
        writer.write_all(&bytes).await?;
        nwrite = nwrite.saturating_add(bytes.len());
    }
    writer.flush().await?;
    Ok(nwrite)
}

/// `NoSuchBucket`
fn no_such_bucket() -> S3Error {
    code_error!(NoSuchBucket, "The specified bucket does not exist.")
}

/// `NoSuchKey`
fn no_such_key() -> S3Error {
    code_error!(NoSuchKey, "The specified key does not exist.")
}

/// `NoSuchUpload`
fn no_such_upload() -> S3Error {
    code_error!(
        NoSuchUpload,
        "The specified multipart upload does not exist."
    )
}

/// quoted single-object etag
fn format_etag(md5_sum: &str) -> String {
    format!("\"{}\"", md5_sum)
}

#[async_trait]
impl S3Storage for FileSystem {
    #[tracing::instrument]
    async fn create_bucket(&self, input: CreateBucketRequest) -> S3Result<CreateBucketOutput> {
        let path = trace_try!(self.get_bucket_path(&input.bucket));

        if !path.exists() {
            trace_try!(async_fs::create_dir(&path).await);
        }

        Ok(CreateBucketOutput {
            location: Some(format!("/{}", input.bucket)),
        })
    }

    #[tracing::instrument]
    async fn delete_bucket(&self, input: DeleteBucketRequest) -> S3Result<DeleteBucketOutput> {
        let path = trace_try!(self.get_bucket_path(&input.bucket));

        if !path.exists() {
            return Err(no_such_bucket());
        }

        let mut entries = trace_try!(async_fs::read_dir(&path).await);
        if entries.next().await.is_some() {
            return Err(code_error!(
                BucketNotEmpty,
                "The bucket you tried to delete is not empty."
            ));
        }

        trace_try!(async_fs::remove_dir(&path).await);
        Ok(DeleteBucketOutput)
    }

    #[tracing::instrument]
    async fn head_bucket(&self, input: HeadBucketRequest) -> S3Result<HeadBucketOutput> {
        let path = trace_try!(self.get_bucket_path(&input.bucket));
        if !path.exists() {
            return Err(no_such_bucket());
        }
        Ok(HeadBucketOutput)
    }

    #[tracing::instrument]
    async fn list_buckets(&self, _: ListBucketsRequest) -> S3Result<ListBucketsOutput> {
        let mut buckets = Vec::new();

        let mut iter = trace_try!(async_fs::read_dir(&self.root).await);
        while let Some(entry) = iter.next().await {
            let entry = trace_try!(entry);
            let file_type = trace_try!(entry.file_type().await);
            if !file_type.is_dir() {
                continue;
            }
            let file_name = entry.file_name();
            let name = file_name.to_string_lossy();
            if S3Path::check_bucket_name(&name) {
                let metadata = trace_try!(entry.metadata().await);
                let creation_date = metadata.modified().ok().map(time::to_iso8601);
                buckets.push(Bucket {
                    name: name.into_owned(),
                    creation_date,
                });
            }
        }

        buckets.sort_by(|lhs, rhs| lhs.name.cmp(&rhs.name));
        Ok(ListBucketsOutput { buckets })
    }

    #[tracing::instrument]
    async fn list_objects_v2(
        &self,
        input: ListObjectsV2Request,
    ) -> S3Result<ListObjectsV2Output> {
        let bucket_path = trace_try!(self.get_bucket_path(&input.bucket));
        if !bucket_path.exists() {
            return Err(no_such_bucket());
        }

        let prefix = input.prefix.clone().unwrap_or_default();
        let delimiter = input.delimiter.clone().filter(|d| !d.is_empty());
        let max_keys = input
            .max_keys
            .unwrap_or(limits::MAX_KEYS)
            .min(limits::MAX_KEYS);

        let start_key = match input.continuation_token {
            None => String::new(),
            Some(ref token) => {
                let bytes = base64::decode_config(token, base64::URL_SAFE_NO_PAD)
                    .map_err(|e| invalid_argument!("Invalid continuation token.", e))?;
                String::from_utf8(bytes)
                    .map_err(|e| invalid_argument!("Invalid continuation token.", e))?
            }
        };

        let objects = trace_try!(self.collect_objects(&bucket_path).await);

        let mut contents: Vec<Object> = Vec::new();
        let mut common_prefixes: Vec<String> = Vec::new();
        let mut emitted: usize = 0;
        let mut is_truncated = false;
        let mut next_continuation_token = None;

        for (key, size, modified) in objects {
            if key.as_str() < start_key.as_str() {
                continue;
            }
            if !key.starts_with(&prefix) {
                continue;
            }

            // group into a common prefix when the delimiter occurs after the prefix
            let group = delimiter.as_deref().and_then(|d| {
                key.get(prefix.len()..)?
                    .find(d)
                    .map(|idx| key[..prefix.len() + idx + d.len()].to_owned())
            });

            if let Some(ref group_prefix) = group {
                if common_prefixes.last() == Some(group_prefix) {
                    continue;
                }
            }

            if emitted == max_keys {
                is_truncated = true;
                next_continuation_token =
                    Some(base64::encode_config(&key, base64::URL_SAFE_NO_PAD));
                break;
            }

            match group {
                Some(group_prefix) => common_prefixes.push(group_prefix),
                None => {
                    let object_path = self.get_object_path(&input.bucket, &key)?;
                    let md5_sum = trace_try!(self.get_md5_sum(&object_path).await);
                    contents.push(Object {
                        key,
                        last_modified: time::to_iso8601(modified),
                        size,
                        e_tag: format_etag(&md5_sum),
                    });
                }
            }
            emitted = emitted.saturating_add(1);
        }

        Ok(ListObjectsV2Output {
            name: input.bucket,
            prefix: input.prefix,
            delimiter,
            max_keys,
            key_count: emitted,
            is_truncated,
            next_continuation_token,
            contents,
            common_prefixes,
        })
    }

    #[tracing::instrument]
    async fn put_object(&self, input: PutObjectRequest) -> S3Result<PutObjectOutput> {
        let PutObjectRequest { bucket, key, body } = input;

        let body = body.ok_or_else(|| invalid_argument!("Missing request body."))?;

        let bucket_path = trace_try!(self.get_bucket_path(&bucket));
        if !bucket_path.exists() {
            return Err(no_such_bucket());
        }

        let object_path = self.get_object_path(&bucket, &key)?;

        if key.ends_with('/') {
            // directory marker; no content allowed
            let content: Vec<_> = trace_try!(body.try_collect().await);
            if content.iter().map(Bytes::len).sum::<usize>() != 0 {
                return Err(invalid_argument!(
                    "Unexpected request body when creating a directory object."
                ));
            }
            trace_try!(async_fs::create_dir_all(&object_path).await);
            return Ok(PutObjectOutput::default());
        }

        if let Some(dir_path) = object_path.parent() {
            trace_try!(async_fs::create_dir_all(&dir_path).await);
        }

        let (size, md5_sum) = trace_try!(self.write_atomic(&object_path, body).await);

        debug!(
            path = %object_path.display(),
            ?size,
            %md5_sum,
            "PutObject: write file",
        );

        Ok(PutObjectOutput {
            e_tag: Some(format_etag(&md5_sum)),
        })
    }

    #[tracing::instrument]
    async fn get_object(&self, input: GetObjectRequest) -> S3Result<GetObjectOutput> {
        let object_path = self.get_object_path(&input.bucket, &input.key)?;

        let mut file = match File::open(&object_path).await {
            Ok(file) => file,
            Err(ref e) if e.kind() == io::ErrorKind::NotFound => return Err(no_such_key()),
            Err(e) => return Err(internal_error!(e)),
        };

        let file_metadata = trace_try!(file.metadata().await);
        if file_metadata.is_dir() {
            return Err(no_such_key());
        }

        let size = file_metadata.len();
        let last_modified = file_metadata.modified().ok().map(time::to_http_date);

        let (start, end) = match input.range {
            None => (0, size.saturating_sub(1)),
            Some(ref range) => range.resolve(size).ok_or_else(|| {
                invalid_argument!("The requested range is not satisfiable.")
            })?,
        };
        let content_length = if size == 0 { 0 } else { end - start + 1 };

        let content_range = input
            .range
            .is_some()
            .then(|| format!("bytes {}-{}/{}", start, end, size));

        if start > 0 {
            let _pos = trace_try!(file.seek(io::SeekFrom::Start(start)).await);
        }

        let md5_sum = trace_try!(self.get_md5_sum(&object_path).await);

        let content_length_usize = trace_try!(usize::try_from(content_length));
        let stream = BytesStream::new(file, READ_BUF_SIZE, Some(content_length_usize));

        Ok(GetObjectOutput {
            body: Some(ByteStream::new(stream)),
            content_length,
            content_range,
            last_modified,
            e_tag: Some(format_etag(&md5_sum)),
        })
    }

    #[tracing::instrument]
    async fn head_object(&self, input: HeadObjectRequest) -> S3Result<HeadObjectOutput> {
        let object_path = self.get_object_path(&input.bucket, &input.key)?;

        let file_metadata = match async_fs::metadata(&object_path).await {
            Ok(metadata) => metadata,
            Err(ref e) if e.kind() == io::ErrorKind::NotFound => return Err(no_such_key()),
            Err(e) => return Err(internal_error!(e)),
        };
        if file_metadata.is_dir() {
            return Err(no_such_key());
        }

        let last_modified = file_metadata.modified().ok().map(time::to_http_date);
        let md5_sum = trace_try!(self.get_md5_sum(&object_path).await);

        Ok(HeadObjectOutput {
            content_length: file_metadata.len(),
            last_modified,
            e_tag: Some(format_etag(&md5_sum)),
        })
    }

    #[tracing::instrument]
    async fn delete_object(&self, input: DeleteObjectRequest) -> S3Result<DeleteObjectOutput> {
        let object_path = self.get_object_path(&input.bucket, &input.key)?;

        let ret = if input.key.ends_with('/') {
            async_fs::remove_dir(&object_path).await
        } else {
            async_fs::remove_file(&object_path).await
        };
        match ret {
            Ok(()) => {}
            // deletion is idempotent
            Err(ref e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(internal_error!(e)),
        }

        Ok(DeleteObjectOutput)
    }

    #[tracing::instrument]
    async fn delete_objects(&self, input: DeleteObjectsRequest) -> S3Result<DeleteObjectsOutput> {
        let mut deleted = Vec::new();

        for object in input.objects {
            let object_path = self.get_object_path(&input.bucket, &object.key)?;
            match async_fs::remove_file(&object_path).await {
                Ok(()) => {}
                Err(ref e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(internal_error!(e)),
            }
            deleted.push(DeletedObject { key: object.key });
        }

        Ok(DeleteObjectsOutput { deleted })
    }

    #[tracing::instrument]
    async fn create_multipart_upload(
        &self,
        input: CreateMultipartUploadRequest,
    ) -> S3Result<CreateMultipartUploadOutput> {
        let bucket_path = trace_try!(self.get_bucket_path(&input.bucket));
        if !bucket_path.exists() {
            return Err(no_such_bucket());
        }

        let upload_id = Uuid::new_v4().simple().to_string();
        let upload_path = self.get_upload_path(&upload_id)?;

        trace_try!(async_fs::create_dir_all(&upload_path).await);

        let meta = format!("{}\n{}\n", input.bucket, input.key);
        trace_try!(async_fs::write(upload_path.join(UPLOAD_META_FILE), meta).await);

        Ok(CreateMultipartUploadOutput {
            bucket: input.bucket,
            key: input.key,
            upload_id,
        })
    }

    #[tracing::instrument]
    async fn upload_part(&self, input: UploadPartRequest) -> S3Result<UploadPartOutput> {
        let UploadPartRequest {
            upload_id,
            part_number,
            body,
            ..
        } = input;

        let body = body.ok_or_else(|| invalid_argument!("Missing request body."))?;

        let upload_path = self.get_upload_path(&upload_id)?;
        if !upload_path.exists() {
            return Err(no_such_upload());
        }

        let part_path = upload_path.join(part_number.to_string());
        let (size, md5_sum) = trace_try!(self.write_atomic(&part_path, body).await);

        debug!(
            path = %part_path.display(),
            ?size,
            %md5_sum,
            "UploadPart: write file",
        );

        Ok(UploadPartOutput {
            e_tag: Some(format_etag(&md5_sum)),
        })
    }

    #[tracing::instrument]
    async fn complete_multipart_upload(
        &self,
        input: CompleteMultipartUploadRequest,
    ) -> S3Result<CompleteMultipartUploadOutput> {
        let upload_path = self.get_upload_path(&input.upload_id)?;
        if !upload_path.exists() {
            return Err(no_such_upload());
        }

        let meta = trace_try!(async_fs::read_to_string(upload_path.join(UPLOAD_META_FILE)).await);
        let mut lines = meta.lines();
        let (bucket, key) = match (lines.next(), lines.next()) {
            (Some(bucket), Some(key)) => (bucket.to_owned(), key.to_owned()),
            _ => {
                return Err(internal_error!(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "corrupt upload metadata",
                )))
            }
        };

        // parts are assembled in ascending numeric file order
        let mut part_numbers: Vec<u32> = Vec::new();
        let mut entries = trace_try!(async_fs::read_dir(&upload_path).await);
        while let Some(entry) = entries.next().await {
            let entry = trace_try!(entry);
            if let Ok(n) = entry.file_name().to_string_lossy().parse::<u32>() {
                part_numbers.push(n);
            }
        }
        part_numbers.sort_unstable();

        let object_path = self.get_object_path(&bucket, &key)?;
        if let Some(dir_path) = object_path.parent() {
            trace_try!(async_fs::create_dir_all(&dir_path).await);
        }

        let tmp_path = object_path
            .parent()
            .unwrap_or(&self.root)
            .join(format!(".{}.tmp", Uuid::new_v4().simple()));

        let mut part_digests: Vec<u8> = Vec::new();
        let mut size: u64 = 0;
        {
            let file = trace_try!(File::create(&tmp_path).await);
            let mut writer = BufWriter::new(file);
            let mut buf = vec![0; READ_BUF_SIZE];

            for part_number in &part_numbers {
                let part_path = upload_path.join(part_number.to_string());
                let mut reader = trace_try!(File::open(&part_path).await);
                let mut md5_hash = Md5::new();
                loop {
                    let nread = trace_try!(reader.read(&mut buf).await);
                    if nread == 0 {
                        break;
                    }
                    md5_hash.update(&buf[..nread]);
                    trace_try!(writer.write_all(&buf[..nread]).await);
                    size = size.saturating_add(nread as u64);
                }
                part_digests.extend_from_slice(&md5_hash.finalize());
            }

            trace_try!(writer.close().await);
        }

        trace_try!(async_fs::rename(&tmp_path, &object_path).await);
        trace_try!(async_fs::remove_dir_all(&upload_path).await);

        let e_tag = format!(
            "\"{}-{}\"",
            crypto::to_hex_string(Md5::digest(&part_digests)),
            part_numbers.len()
        );

        debug!(
            path = %object_path.display(),
            ?size,
            %e_tag,
            "CompleteMultipartUpload: assemble file",
        );

        Ok(CompleteMultipartUploadOutput {
            location: Some(format!("/{}/{}", bucket, key)),
            bucket,
            key,
            e_tag: Some(e_tag),
        })
    }

    #[tracing::instrument]
    async fn abort_multipart_upload(
        &self,
        input: AbortMultipartUploadRequest,
    ) -> S3Result<AbortMultipartUploadOutput> {
        let upload_path = self.get_upload_path(&input.upload_id)?;
        if !upload_path.exists() {
            return Err(no_such_upload());
        }

        trace_try!(async_fs::remove_dir_all(&upload_path).await);
        Ok(AbortMultipartUploadOutput)
    }
}

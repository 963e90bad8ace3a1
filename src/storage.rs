//! Storage abstraction consumed by `S3Service`

use crate::dto::{
    AbortMultipartUploadOutput, AbortMultipartUploadRequest, CompleteMultipartUploadOutput,
    CompleteMultipartUploadRequest, CreateBucketOutput, CreateBucketRequest,
    CreateMultipartUploadOutput, CreateMultipartUploadRequest, DeleteBucketOutput,
    DeleteBucketRequest, DeleteObjectOutput, DeleteObjectRequest, DeleteObjectsOutput,
    DeleteObjectsRequest, GetObjectOutput, GetObjectRequest, HeadBucketOutput, HeadBucketRequest,
    HeadObjectOutput, HeadObjectRequest, ListBucketsOutput, ListBucketsRequest,
    ListObjectsV2Output, ListObjectsV2Request, PutObjectOutput, PutObjectRequest,
    UploadPartOutput, UploadPartRequest,
};
use crate::errors::S3Result;

use async_trait::async_trait;

/// S3 storage
#[async_trait]
pub trait S3Storage {
    /// [`CreateBucket`](https://docs.aws.amazon.com/AmazonS3/latest/API/API_CreateBucket.html)
    async fn create_bucket(&self, input: CreateBucketRequest) -> S3Result<CreateBucketOutput>;

    /// [`DeleteBucket`](https://docs.aws.amazon.com/AmazonS3/latest/API/API_DeleteBucket.html)
    async fn delete_bucket(&self, input: DeleteBucketRequest) -> S3Result<DeleteBucketOutput>;

    /// [`HeadBucket`](https://docs.aws.amazon.com/AmazonS3/latest/API/API_HeadBucket.html)
    async fn head_bucket(&self, input: HeadBucketRequest) -> S3Result<HeadBucketOutput>;

    /// [`ListBuckets`](https://docs.aws.amazon.com/AmazonS3/latest/API/API_ListBuckets.html)
    async fn list_buckets(&self, input: ListBucketsRequest) -> S3Result<ListBucketsOutput>;

    /// [`ListObjectsV2`](https://docs.aws.amazon.com/AmazonS3/latest/API/API_ListObjectsV2.html)
    async fn list_objects_v2(&self, input: ListObjectsV2Request)
        -> S3Result<ListObjectsV2Output>;

    /// [`PutObject`](https://docs.aws.amazon.com/AmazonS3/latest/API/API_PutObject.html)
    async fn put_object(&self, input: PutObjectRequest) -> S3Result<PutObjectOutput>;

    /// [`GetObject`](https://docs.aws.amazon.com/AmazonS3/latest/API/API_GetObject.html)
    async fn get_object(&self, input: GetObjectRequest) -> S3Result<GetObjectOutput>;

    /// [`HeadObject`](https://docs.aws.amazon.com/AmazonS3/latest/API/API_HeadObject.html)
    async fn head_object(&self, input: HeadObjectRequest) -> S3Result<HeadObjectOutput>;

    /// [`DeleteObject`](https://docs.aws.amazon.com/AmazonS3/latest/API/API_DeleteObject.html)
    async fn delete_object(&self, input: DeleteObjectRequest) -> S3Result<DeleteObjectOutput>;

    /// [`DeleteObjects`](https://docs.aws.amazon.com/AmazonS3/latest/API/API_DeleteObjects.html)
    async fn delete_objects(&self, input: DeleteObjectsRequest) -> S3Result<DeleteObjectsOutput>;

    /// [`CreateMultipartUpload`](https://docs.aws.amazon.com/AmazonS3/latest/API/API_CreateMultipartUpload.html)
    async fn create_multipart_upload(
        &self,
        input: CreateMultipartUploadRequest,
    ) -> S3Result<CreateMultipartUploadOutput>;

    /// [`UploadPart`](https://docs.aws.amazon.com/AmazonS3/latest/API/API_UploadPart.html)
    async fn upload_part(&self, input: UploadPartRequest) -> S3Result<UploadPartOutput>;

    /// [`CompleteMultipartUpload`](https://docs.aws.amazon.com/AmazonS3/latest/API/API_CompleteMultipartUpload.html)
    async fn complete_multipart_upload(
        &self,
        input: CompleteMultipartUploadRequest,
    ) -> S3Result<CompleteMultipartUploadOutput>;

    /// [`AbortMultipartUpload`](https://docs.aws.amazon.com/AmazonS3/latest/API/API_AbortMultipartUpload.html)
    async fn abort_multipart_upload(
        &self,
        input: AbortMultipartUploadRequest,
    ) -> S3Result<AbortMultipartUploadOutput>;
}

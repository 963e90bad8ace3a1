//! Common Request Headers

mod amz_content_sha256;
mod amz_date;
mod authorization_v4;
mod range;

pub use self::amz_content_sha256::AmzContentSha256;
pub use self::amz_date::AmzDate;
pub use self::authorization_v4::{AuthorizationV4, CredentialV4};
pub use self::range::Range;

pub use hyper::header::*;

use once_cell::sync::Lazy;

macro_rules! declare_header_name{
    {$($(#[$docs:meta])* $n:ident: $s:expr;)+} => {
        $(
            $(#[$docs])*
            pub static $n: Lazy<HeaderName> = Lazy::new(||HeaderName::from_static($s));
        )+

        #[test]
        fn check_headers(){
            $(
                assert_eq!($n.as_str(), $s);
            )+
        }
    }
}

declare_header_name! {
    /// x-amz-date
    X_AMZ_DATE: "x-amz-date";

    /// x-amz-content-sha256
    X_AMZ_CONTENT_SHA256: "x-amz-content-sha256";

    /// x-amz-decoded-content-length
    X_AMZ_DECODED_CONTENT_LENGTH: "x-amz-decoded-content-length";
}

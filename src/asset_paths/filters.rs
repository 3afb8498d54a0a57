use url::Url;

/// Determine whether an asset reference points at an externally hosted resource.
///
/// Protocol-relative references (`//cdn.example.com/app.js`) and fully qualified URLs are
/// treated as remote. Single letter schemes are rejected so that Windows drive paths such as
/// `C:/assets/app.css` stay local.
pub fn is_remote_reference(value: &str) -> bool {
    if value.starts_with("//") {
        return true;
    }

    Url::parse(value).is_ok_and(|url| url.scheme().len() > 1)
}

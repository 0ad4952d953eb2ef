use std::{error::Error, fmt, path::Path};

/// Instruction sent along with every image to the description service.
pub const DESCRIPTION_PROMPT: &str = "What's in this image? The first line should say, \
the image depicts a .... Followed by a detailed description of less than 4 lines on the \
next paragraph.";

/// Image encodings accepted for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

impl ImageFormat {
    /// Detects the format from a file name extension, case-insensitively.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let ext = Path::new(file_name).extension()?.to_str()?;
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            _ => None,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
        }
    }
}

/// An uploaded image waiting to be described.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    file_name: String,
    format: ImageFormat,
    bytes: Vec<u8>,
}

impl ImageUpload {
    /// Creates a new `ImageUpload`.
    ///
    /// # Errors
    /// Returns `DescribeError::UnsupportedFormat` unless the file is a jpg, jpeg
    /// or png, and `DescribeError::EmptyImage` if there are no bytes.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, DescribeError> {
        let file_name = file_name.into();
        let format = ImageFormat::from_file_name(&file_name)
            .ok_or_else(|| DescribeError::UnsupportedFormat(file_name.clone()))?;

        if bytes.is_empty() {
            return Err(DescribeError::EmptyImage);
        }

        Ok(Self {
            file_name,
            format,
            bytes,
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Image description failures.
#[derive(Debug)]
pub enum DescribeError {
    UnsupportedFormat(String),
    EmptyImage,
    /// The service answered with nothing to show.
    EmptyDescription,
    /// The service could not be reached or refused the request.
    Service(Box<dyn Error + Send + Sync>),
}

impl fmt::Display for DescribeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescribeError::UnsupportedFormat(name) => {
                write!(f, "'{name}' is not a jpg, jpeg or png image")
            }
            DescribeError::EmptyImage => f.write_str("the uploaded image is empty"),
            DescribeError::EmptyDescription => f.write_str("the image description is empty"),
            DescribeError::Service(e) => write!(f, "description service error: {e}"),
        }
    }
}

impl Error for DescribeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DescribeError::Service(e) => Some(&**e),
            _ => None,
        }
    }
}

/// Turns an image into a short text description.
///
/// Implementations wrap whatever vision service is available; the intake flow
/// only sees this trait.
pub trait ImageDescriber {
    /// Describes `image` following [`DESCRIPTION_PROMPT`].
    ///
    /// # Errors
    /// Returns `DescribeError::Service` if the description could not be obtained.
    fn describe(&self, image: &ImageUpload) -> Result<String, DescribeError>;
}

impl<D: ImageDescriber + ?Sized> ImageDescriber for &D {
    fn describe(&self, image: &ImageUpload) -> Result<String, DescribeError> {
        (**self).describe(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_form_extensions() {
        assert_eq!(ImageFormat::from_file_name("cat.JPG"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_file_name("cat.jpeg"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_file_name("dog.png"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_file_name("dog.gif"), None);
        assert_eq!(ImageFormat::from_file_name("png"), None);
    }

    #[test]
    fn upload_needs_bytes_and_a_known_format() {
        assert!(matches!(
            ImageUpload::new("cat.bmp", vec![1]),
            Err(DescribeError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            ImageUpload::new("cat.png", Vec::new()),
            Err(DescribeError::EmptyImage)
        ));

        let upload = ImageUpload::new("cat.png", vec![0x89, b'P']).unwrap();
        assert_eq!(upload.format().mime_type(), "image/png");
    }
}

use bytes::Bytes;

/// Accepted upload types, decided by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Image,
}

impl FileKind {
    /// `.pdf` → Pdf; `.png`, `.jpg`, `.jpeg` → Image; anything else is unsupported.
    /// Matching is case-insensitive.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let extension = filename.rsplit_once('.')?.1.to_ascii_lowercase();
        match extension.as_str() {
            "pdf" => Some(FileKind::Pdf),
            "png" | "jpg" | "jpeg" => Some(FileKind::Image),
            _ => None,
        }
    }
}

/// A CV as received from the client.
#[derive(Debug, Clone)]
pub enum CvInput {
    Text(String),
    Pdf(Bytes),
    Image(Bytes),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_kind_from_filename() {
        assert_eq!(FileKind::from_filename("cv.pdf"), Some(FileKind::Pdf));
        assert_eq!(FileKind::from_filename("CV.PDF"), Some(FileKind::Pdf));
        assert_eq!(FileKind::from_filename("scan.jpeg"), Some(FileKind::Image));
        assert_eq!(FileKind::from_filename("scan.final.Png"), Some(FileKind::Image));
        assert_eq!(FileKind::from_filename("cv.docx"), None);
        assert_eq!(FileKind::from_filename("pdf"), None);
        assert_eq!(FileKind::from_filename(""), None);
    }
}

use crate::{
    application::usercases::track_upload::UploadError,
    domain::value_objects::uploads::{IncomingFile, MediaKind, UploadBundle, UploadSubmission},
};

pub const DEFAULT_AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "m4a", "ogg"];
pub const DEFAULT_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif"];

pub const DEFAULT_AUDIO_MAX_BYTES: u64 = 20 * 1024 * 1024;
pub const DEFAULT_IMAGE_MAX_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    pub allowed_audio_extensions: Vec<String>,
    pub allowed_image_extensions: Vec<String>,
    pub audio_max_bytes: u64,
    pub image_max_bytes: u64,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            allowed_audio_extensions: DEFAULT_AUDIO_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            allowed_image_extensions: DEFAULT_IMAGE_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            audio_max_bytes: DEFAULT_AUDIO_MAX_BYTES,
            image_max_bytes: DEFAULT_IMAGE_MAX_BYTES,
        }
    }
}

/// Fail-fast validation of an add-music submission. Checks run in a fixed order and the
/// first failure is returned; nothing touches the network or the filesystem.
pub fn validate(
    submission: &UploadSubmission,
    policy: &UploadPolicy,
) -> Result<UploadBundle, UploadError> {
    let audio_file = submission
        .audio
        .as_ref()
        .ok_or(UploadError::MissingFile(MediaKind::Audio))?;
    let image_file = submission
        .image
        .as_ref()
        .ok_or(UploadError::MissingFile(MediaKind::Image))?;

    let title = required_field(submission.title.as_deref(), "title")?;
    let artist = required_field(submission.artist.as_deref(), "artist")?;

    let audio_extension = audio_file.extension();
    if !policy.allowed_audio_extensions.contains(&audio_extension) {
        return Err(UploadError::InvalidAudioFormat {
            extension: audio_extension,
            allowed: policy.allowed_audio_extensions.clone(),
        });
    }

    let image_extension = image_file.extension();
    if !policy.allowed_image_extensions.contains(&image_extension) {
        return Err(UploadError::InvalidImageFormat {
            extension: image_extension,
            allowed: policy.allowed_image_extensions.clone(),
        });
    }

    check_size(audio_file, MediaKind::Audio, policy.audio_max_bytes)?;
    check_size(image_file, MediaKind::Image, policy.image_max_bytes)?;

    Ok(UploadBundle {
        title,
        artist,
        audio_file: audio_file.clone(),
        image_file: image_file.clone(),
    })
}

fn required_field(value: Option<&str>, name: &'static str) -> Result<String, UploadError> {
    match value.map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => Ok(trimmed.to_string()),
        _ => Err(UploadError::MissingField(name)),
    }
}

fn check_size(file: &IncomingFile, kind: MediaKind, limit: u64) -> Result<(), UploadError> {
    if file.size_bytes > limit {
        return Err(UploadError::FileTooLarge {
            kind,
            size: file.size_bytes,
            limit,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::uploads::TempFile;
    use std::sync::Arc;

    const MIB: u64 = 1024 * 1024;

    fn file(name: &str, size_bytes: u64) -> IncomingFile {
        IncomingFile {
            original_name: name.to_string(),
            temp_file: Arc::new(TempFile::new(format!("/nonexistent/uploads/{}", name))),
            size_bytes,
            mime_type: "application/octet-stream".to_string(),
        }
    }

    fn submission(audio: Option<IncomingFile>, image: Option<IncomingFile>) -> UploadSubmission {
        UploadSubmission {
            title: Some("  Test  ".to_string()),
            artist: Some("Artist".to_string()),
            audio,
            image,
        }
    }

    fn valid() -> UploadSubmission {
        submission(
            Some(file("song.mp3", MIB)),
            Some(file("cover.png", 100 * 1024)),
        )
    }

    #[test]
    fn valid_submission_produces_trimmed_bundle() {
        let bundle = validate(&valid(), &UploadPolicy::default()).unwrap();

        assert_eq!(bundle.title, "Test");
        assert_eq!(bundle.artist, "Artist");
        assert_eq!(bundle.audio_file.original_name, "song.mp3");
        assert_eq!(bundle.image_file.original_name, "cover.png");
    }

    #[test]
    fn missing_audio_is_reported_before_missing_image() {
        let err = validate(&submission(None, None), &UploadPolicy::default()).unwrap_err();
        assert!(matches!(err, UploadError::MissingFile(MediaKind::Audio)));

        let err = validate(
            &submission(Some(file("song.mp3", MIB)), None),
            &UploadPolicy::default(),
        )
        .unwrap_err();
        assert!(matches!(err, UploadError::MissingFile(MediaKind::Image)));
    }

    #[test]
    fn missing_file_wins_over_missing_field() {
        let mut input = submission(None, Some(file("cover.png", 1)));
        input.title = None;

        let err = validate(&input, &UploadPolicy::default()).unwrap_err();
        assert!(matches!(err, UploadError::MissingFile(MediaKind::Audio)));
    }

    #[test]
    fn blank_title_or_artist_is_missing_field() {
        let mut input = valid();
        input.title = Some("   ".to_string());
        let err = validate(&input, &UploadPolicy::default()).unwrap_err();
        assert!(matches!(err, UploadError::MissingField("title")));

        let mut input = valid();
        input.artist = None;
        let err = validate(&input, &UploadPolicy::default()).unwrap_err();
        assert!(matches!(err, UploadError::MissingField("artist")));
    }

    #[test]
    fn audio_outside_allow_list_is_rejected() {
        for name in ["song.exe", "song.flac", "song"] {
            let input = submission(Some(file(name, MIB)), Some(file("cover.png", 1)));
            let err = validate(&input, &UploadPolicy::default()).unwrap_err();
            match err {
                UploadError::InvalidAudioFormat { extension, allowed } => {
                    assert_eq!(extension, file(name, 0).extension());
                    assert_eq!(allowed, vec!["mp3", "wav", "m4a", "ogg"]);
                }
                other => panic!("expected InvalidAudioFormat for {name}, got {other:?}"),
            }
        }
    }

    #[test]
    fn audio_extension_check_is_case_insensitive() {
        let input = submission(Some(file("SONG.WAV", MIB)), Some(file("Cover.JPEG", 1)));
        assert!(validate(&input, &UploadPolicy::default()).is_ok());
    }

    #[test]
    fn image_outside_allow_list_is_rejected() {
        let input = submission(Some(file("song.mp3", MIB)), Some(file("cover.bmp", 1)));
        let err = validate(&input, &UploadPolicy::default()).unwrap_err();
        assert!(matches!(
            err,
            UploadError::InvalidImageFormat { ref extension, .. } if extension == "bmp"
        ));
    }

    #[test]
    fn bad_extension_wins_over_oversize() {
        let input = submission(
            Some(file("song.exe", 100 * MIB)),
            Some(file("cover.png", 1)),
        );
        let err = validate(&input, &UploadPolicy::default()).unwrap_err();
        assert!(matches!(err, UploadError::InvalidAudioFormat { .. }));
    }

    #[test]
    fn audio_over_ceiling_is_too_large() {
        let input = submission(Some(file("song.mp3", 30 * MIB)), Some(file("cover.png", 1)));
        let err = validate(&input, &UploadPolicy::default()).unwrap_err();
        match err {
            UploadError::FileTooLarge { kind, size, limit } => {
                assert_eq!(kind, MediaKind::Audio);
                assert_eq!(size, 30 * MIB);
                assert_eq!(limit, 20 * MIB);
            }
            other => panic!("expected FileTooLarge, got {other:?}"),
        }
    }

    #[test]
    fn size_exactly_at_ceiling_is_accepted() {
        let input = submission(
            Some(file("song.mp3", 20 * MIB)),
            Some(file("cover.png", 5 * MIB)),
        );
        assert!(validate(&input, &UploadPolicy::default()).is_ok());
    }

    #[test]
    fn image_over_ceiling_is_too_large() {
        let input = submission(
            Some(file("song.mp3", MIB)),
            Some(file("cover.png", 5 * MIB + 1)),
        );
        let err = validate(&input, &UploadPolicy::default()).unwrap_err();
        assert!(matches!(
            err,
            UploadError::FileTooLarge {
                kind: MediaKind::Image,
                ..
            }
        ));
    }

    #[test]
    fn custom_policy_allow_list_is_honoured() {
        let policy = UploadPolicy {
            allowed_audio_extensions: vec!["flac".to_string()],
            ..UploadPolicy::default()
        };
        let input = submission(Some(file("song.flac", MIB)), Some(file("cover.png", 1)));
        assert!(validate(&input, &policy).is_ok());

        let err = validate(&valid(), &policy).unwrap_err();
        assert!(matches!(err, UploadError::InvalidAudioFormat { .. }));
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for people scanning documents.
//
// Every technical error is mapped to plain English with a clear suggestion.
// The severity drives how a front end presents it.

use crate::error::DocscanError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// A new photo (or a different file) is needed.
    RetakePhoto,
    /// The user must change a setting or argument.
    ActionRequired,
    /// Something outside the photo went wrong (disk, encoder).
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary.
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    /// Severity level.
    pub severity: Severity,
}

/// Convert a `DocscanError` into a `HumanError`.
pub fn humanize_error(err: &DocscanError) -> HumanError {
    match err {
        DocscanError::InputUnreadable(detail) => HumanError {
            message: "We couldn't open this picture.".into(),
            suggestion: format!(
                "Check that the file is a photo (JPEG, PNG, TIFF) and isn't damaged. ({detail})"
            ),
            severity: Severity::RetakePhoto,
        },

        DocscanError::NoDocumentFound { .. } => HumanError {
            message: "We couldn't find the edges of your document.".into(),
            suggestion: "Place the page on a plain, darker surface so all four corners are visible, then take the photo again.".into(),
            severity: Severity::RetakePhoto,
        },

        DocscanError::DegenerateGeometry { .. } => HumanError {
            message: "The document outline we found is too thin to flatten.".into(),
            suggestion: "Take the photo from straight above the page so it isn't seen edge-on.".into(),
            severity: Severity::RetakePhoto,
        },

        DocscanError::InvalidConfig(detail) => HumanError {
            message: "One of the scanner settings isn't valid.".into(),
            suggestion: format!("Fix the setting and try again. ({detail})"),
            severity: Severity::ActionRequired,
        },

        DocscanError::Serialization(e) => HumanError {
            message: "The settings file couldn't be read.".into(),
            suggestion: format!("Make sure the settings file is valid JSON. ({e})"),
            severity: Severity::ActionRequired,
        },

        DocscanError::ImageError(detail) => HumanError {
            message: "We couldn't save the scanned page.".into(),
            suggestion: format!("Try a different output format or folder. ({detail})"),
            severity: Severity::Permanent,
        },

        DocscanError::Io(e) => {
            let suggestion = match e.kind() {
                std::io::ErrorKind::NotFound => "Check that the file or folder exists.".into(),
                std::io::ErrorKind::PermissionDenied => {
                    "Check that you are allowed to read and write in that folder.".into()
                }
                _ => format!("Check the file and try again. ({e})"),
            };
            HumanError {
                message: "A file couldn't be read or written.".into(),
                suggestion,
                severity: Severity::Permanent,
            }
        }
    }
}

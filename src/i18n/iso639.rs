// SPDX-License-Identifier: PMPL-1.0-or-later

//! Display metadata for the catalog's ISO 639-1 codes.
//!
//! Reference: <https://www.loc.gov/standards/iso639-2/php/code_list.php>

use super::catalog::Language;

/// Whether `code` names a catalog language. Entry ids must not pass this.
pub fn is_catalog_code(code: &str) -> bool {
    Language::from_code(code).is_some()
}

/// English name of a catalog language.
pub fn language_name(language: Language) -> &'static str {
    match language {
        Language::English => "English",
        Language::Russian => "Russian",
        Language::Japanese => "Japanese",
        Language::Chinese => "Chinese",
        Language::Spanish => "Spanish",
        Language::Arabic => "Arabic",
        Language::German => "German",
        Language::Portuguese => "Portuguese",
        Language::French => "French",
        Language::Hindi => "Hindi",
    }
}

/// Name of a catalog language written in its own script.
///
/// Used by `ltf langs` so translators see their language as they write it.
pub fn native_name(language: Language) -> &'static str {
    match language {
        Language::English => "English",
        Language::Russian => "Русский",
        Language::Japanese => "日本語",
        Language::Chinese => "中文",
        Language::Spanish => "Español",
        Language::Arabic => "العربية",
        Language::German => "Deutsch",
        Language::Portuguese => "Português",
        Language::French => "Français",
        Language::Hindi => "हिन्दी",
    }
}

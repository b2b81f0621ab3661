use std::ops::Deref;
use derive_more::{Constructor, From};
use teloxide::types::User;

#[derive(Clone, Constructor, From)]
#[cfg_attr(test, derive(Debug))]
pub struct LanguageCode(String);

#[derive(Debug, Hash, Copy, Clone, Eq, PartialEq)]
pub enum SupportedLanguage {
    EN,
    VI,
}

impl LanguageCode {
    pub fn from_user(user: &User) -> Self {
        Self::from_maybe_user(Some(user))
    }

    pub fn from_maybe_user(maybe_user: Option<&User>) -> Self {
        let maybe_code = maybe_user.and_then(|user| {
            user.language_code.as_ref().or_else(|| {
                log::debug!("no language_code for {}, using the default", user.id);
                None
            })
        });
        Self::from_maybe_string(maybe_code)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn to_supported_language(&self) -> SupportedLanguage {
        match self.0.to_ascii_lowercase().as_str() {
            "vi" => SupportedLanguage::VI,
            _    => SupportedLanguage::EN
        }
    }

    fn from_maybe_string(maybe_string: Option<&String>) -> Self {
        maybe_string
            .map(|code| code.split(['-', '_']).next().unwrap_or(code))
            .map(str::to_ascii_lowercase)
            .filter(|primary| !primary.is_empty())
            .map(Self)
            .unwrap_or_else(|| Self("en".to_string()))
    }
}

impl Deref for LanguageCode {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl From<&User> for LanguageCode {
    fn from(value: &User) -> Self {
        Self::from_user(value)
    }
}

impl From<Option<&User>> for LanguageCode {
    fn from(value: Option<&User>) -> Self {
        Self::from_maybe_user(value)
    }
}

#[cfg(test)]
mod test {
    use super::LanguageCode;
    use super::SupportedLanguage::{EN, VI};

    #[test]
    fn primary_subtag_wins() {
        let vi = ["vi", "VI", "vi-VN", "Vi_vn"].map(|code| (code, VI));
        let en = ["en", "en-US", "fr", "de-DE"].map(|code| (code, EN));

        for (case, expected) in vi.into_iter().chain(en) {
            let value = case.to_string();
            let result = LanguageCode::from_maybe_string(Some(&value));
            assert_eq!(result.to_supported_language(), expected, "Case: {case}, result: {result:?}")
        }
    }

    #[test]
    fn empty() {
        for case in [Some(&"".to_string()), None] {
            let result = LanguageCode::from_maybe_string(case);
            assert_eq!(result.to_supported_language(), EN)
        }
    }
}

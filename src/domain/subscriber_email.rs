use validator::ValidateEmail;

/// A syntactically valid email address. The inner value is kept exactly as it
/// was submitted; no lowercasing or trimming happens on the way in.
#[derive(Debug, Clone)]
pub struct SubscriberEmail(String);

impl SubscriberEmail {
    pub fn parse(email: impl ToString) -> Result<Self, String> {
        let email = email.to_string();
        if !ValidateEmail::validate_email(&email) {
            return Err(format!("{email} is not a valid subscriber email"));
        }
        Ok(Self(email))
    }
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriberEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

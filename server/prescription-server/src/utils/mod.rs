pub mod dates;

/// Mask an email for logs: `alice@rx.test` becomes `a***@r***`.
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let head = local.chars().next().map(String::from).unwrap_or_default();
            let tail = domain.chars().next().map(String::from).unwrap_or_default();
            format!("{head}***@{tail}***")
        }
        None => "***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("alice@rx.test"), "a***@r***");
        assert_eq!(mask_email("@x"), "***@x***");
        assert_eq!(mask_email("no-at-sign"), "***");
    }
}

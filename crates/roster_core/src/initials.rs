/// Basic `local@domain.tld` shape check. Display only: the service is the
/// real validator.
pub fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    let is_plain = |part: &str| {
        !part.is_empty() && !part.contains(|c: char| c == '@' || c.is_whitespace())
    };
    if !is_plain(local) || !is_plain(domain) {
        return false;
    }

    domain
        .char_indices()
        .any(|(idx, c)| c == '.' && idx > 0 && idx + 1 < domain.len())
}

/// Derives a 1-2 character uppercase label from an email address.
///
/// `ada.lovelace@x.org` gives `AL`, `grace@x.org` gives `GR`, and anything
/// that fails [`looks_like_email`] gives its uppercased first character.
pub fn initials_from_email(email: &str) -> String {
    if !looks_like_email(email) {
        return first_chars_upper(email, 1);
    }

    let local = email.split('@').next().unwrap_or_default();
    let mut fragments = local
        .split(['.', '-', '_'])
        .filter(|fragment| !fragment.is_empty());

    match (fragments.next(), fragments.next()) {
        (None, _) => first_chars_upper(email, 1),
        (Some(only), None) => first_chars_upper(only, 2),
        (Some(first), Some(second)) => {
            let mut label = first_chars_upper(first, 1);
            label.push_str(&first_chars_upper(second, 1));
            label
        }
    }
}

fn first_chars_upper(text: &str, count: usize) -> String {
    text.chars().take(count).flat_map(char::to_uppercase).collect()
}

#[cfg(test)]
#[path = "tests/initials_tests.rs"]
mod tests;

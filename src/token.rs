static TOKEN_SPECIAL_CHARS: [char; 15] = [
    '!', '#', '$', '%', '&', '\'', '*', '+', '-', '.', '^', '_', '`', '|', '~',
];

pub fn is_valid_token(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| TOKEN_SPECIAL_CHARS.contains(&c) || c.is_ascii_alphanumeric())
}

use rand::{distributions::Alphanumeric, Rng};

pub fn create_random_secret(secret_len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(secret_len)
        .map(char::from)
        .collect()
}

/// Random string of ascii digits, leading zeros included
pub fn create_numeric_code(code_len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..code_len)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_creates_secrets_of_given_length() {
        assert_eq!(create_random_secret(16).len(), 16);
        assert!(create_random_secret(0).is_empty());
    }

    #[test]
    fn it_creates_numeric_codes() {
        let code = create_numeric_code(6);
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
    }
}

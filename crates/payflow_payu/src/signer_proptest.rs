#[cfg(test)]
mod tests {
    use crate::signer::{body_hash, compute_signature};
    use proptest::prelude::*;

    const DATE: &str = "2024-01-01T00:00:00Z";
    const PATH: &str = "/api/v4/payments/authorize";

    fn is_lower_hex(s: &str) -> bool {
        s.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
    }

    proptest! {
        // Output is always 64 lowercase hex chars, whatever the inputs
        #[test]
        fn test_signature_is_lowercase_hex(
            merchant in "[A-Z0-9]{1,16}",
            secret in ".{0,64}",
            body in ".{0,256}",
        ) {
            let sig = compute_signature(&merchant, &secret, DATE, "POST", PATH, "", &body).unwrap();
            prop_assert_eq!(sig.len(), 64);
            prop_assert!(is_lower_hex(&sig));
        }

        // Same inputs, same signature
        #[test]
        fn test_signature_is_deterministic(
            secret in "[a-z0-9]{8,32}",
            body in ".{0,128}",
        ) {
            let a = compute_signature("M", &secret, DATE, "POST", PATH, "", &body).unwrap();
            let b = compute_signature("M", &secret, DATE, "POST", PATH, "", &body).unwrap();
            prop_assert_eq!(a, b);
        }

        // Any change to the body changes the signature
        #[test]
        fn test_body_change_changes_signature(
            body in "[ -~]{0,64}",
            extra in "[ -~]",
        ) {
            let altered = format!("{body}{extra}");
            let a = compute_signature("M", "secret", DATE, "POST", PATH, "", &body).unwrap();
            let b = compute_signature("M", "secret", DATE, "POST", PATH, "", &altered).unwrap();
            prop_assert_ne!(a, b);
        }

        // Different secrets never produce the same signature for the same message
        #[test]
        fn test_secret_change_changes_signature(
            secret_a in "[a-z]{8,16}",
            secret_b in "[A-Z]{8,16}",
        ) {
            let a = compute_signature("M", &secret_a, DATE, "GET", PATH, "", "").unwrap();
            let b = compute_signature("M", &secret_b, DATE, "GET", PATH, "", "").unwrap();
            prop_assert_ne!(a, b);
        }

        // Appending one byte to any single input changes the signature
        #[test]
        fn test_each_input_is_signed(
            field in 0usize..7,
            merchant in "[A-Z0-9]{1,12}",
            secret in "[a-z0-9]{8,32}",
            method in prop::sample::select(vec!["GET", "POST"]),
            path in "/api/v4/payments/[a-z]{1,12}",
            query in "([a-z]{1,6}=[a-z0-9]{1,6})?",
            body in "[ -~]{0,64}",
        ) {
            let mut inputs = [
                merchant,
                secret,
                DATE.to_string(),
                method.to_string(),
                path,
                query,
                body,
            ];
            let sign = |i: &[String; 7]| {
                compute_signature(&i[0], &i[1], &i[2], &i[3], &i[4], &i[5], &i[6]).unwrap()
            };
            let before = sign(&inputs);
            inputs[field].push('x');
            prop_assert_ne!(before, sign(&inputs), "input #{} did not affect the signature", field);
        }

        #[test]
        fn test_body_hash_shape(body in ".{0,256}") {
            let hash = body_hash(&body);
            prop_assert_eq!(hash.len(), 32);
            prop_assert!(is_lower_hex(&hash));
        }
    }
}

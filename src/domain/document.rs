//! Checksum validation for Brazilian taxpayer identifiers.
//!
//! Both validators accept formatted or raw input: every non-digit character is
//! discarded before the length and check-digit rules are applied. They are
//! total over any string and simply answer `false` for malformed input.

use crate::domain::types::ClientKind;

const CPF_LEN: usize = 11;
const CNPJ_LEN: usize = 14;

/// Returns only the ASCII digits of `input`, in order.
pub fn digits(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Converts the digit characters of `input` into their numeric values.
fn digit_values(input: &str) -> Vec<u32> {
    input.chars().filter_map(|c| c.to_digit(10)).collect()
}

/// Repeated-digit sequences pass the checksum but are never issued.
fn is_repeated(values: &[u32]) -> bool {
    values.windows(2).all(|pair| pair[0] == pair[1])
}

/// Check digit over the first `n` CPF digits, weights `n + 1` down to 2.
fn cpf_check_digit(values: &[u32], n: usize) -> u32 {
    let sum: u32 = values[..n]
        .iter()
        .enumerate()
        .map(|(i, d)| d * (n + 1 - i) as u32)
        .sum();
    sum * 10 % 11 % 10
}

/// Check digit over `values` using the cyclic CNPJ weights.
///
/// The weight starts at `len - 7` and decreases by one per digit, wrapping
/// back to 9 when it would drop below 2. For 12 digits this yields
/// `5,4,3,2,9,8,7,6,5,4,3,2`; for 13 digits `6,5,4,3,2,9,8,7,6,5,4,3,2`.
fn cnpj_check_digit(values: &[u32]) -> u32 {
    let mut weight = values.len() as u32 - 7;
    let mut sum = 0;
    for d in values {
        sum += d * weight;
        weight -= 1;
        if weight < 2 {
            weight = 9;
        }
    }
    match sum % 11 {
        r if r < 2 => 0,
        r => 11 - r,
    }
}

/// Validates a CPF (individual taxpayer identifier).
pub fn is_valid_cpf(input: &str) -> bool {
    let values = digit_values(input);
    if values.len() != CPF_LEN || is_repeated(&values) {
        return false;
    }
    cpf_check_digit(&values, 9) == values[9] && cpf_check_digit(&values, 10) == values[10]
}

/// Validates a CNPJ (business taxpayer identifier).
pub fn is_valid_cnpj(input: &str) -> bool {
    let values = digit_values(input);
    if values.len() != CNPJ_LEN || is_repeated(&values) {
        return false;
    }
    let first = cnpj_check_digit(&values[..12]);
    let mut extended = values[..12].to_vec();
    extended.push(first);
    let second = cnpj_check_digit(&extended);
    first == values[12] && second == values[13]
}

/// Validates `input` as the document carried by clients of `kind`.
pub fn is_valid_document(input: &str, kind: ClientKind) -> bool {
    match kind {
        ClientKind::PF => is_valid_cpf(input),
        ClientKind::PJ => is_valid_cnpj(input),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpf_known_values() {
        assert!(is_valid_cpf("11144477735"));
        assert!(is_valid_cpf("111.444.777-35"));
        assert!(is_valid_cpf("529.982.247-25"));
        assert!(!is_valid_cpf("11144477736"));
        assert!(!is_valid_cpf("11144477725"));
    }

    #[test]
    fn cpf_rejects_repeated_digits() {
        for d in 0..=9 {
            let value = d.to_string().repeat(11);
            assert!(!is_valid_cpf(&value), "{value} should be rejected");
        }
    }

    #[test]
    fn cpf_rejects_wrong_lengths_and_garbage() {
        assert!(!is_valid_cpf(""));
        assert!(!is_valid_cpf("abc"));
        assert!(!is_valid_cpf("1114447773"));
        assert!(!is_valid_cpf("111444777350"));
        assert!(!is_valid_cpf("١١١٤٤٤٧٧٧٣٥"));
    }

    #[test]
    fn cnpj_known_values() {
        assert!(is_valid_cnpj("11222333000181"));
        assert!(is_valid_cnpj("11.222.333/0001-81"));
        assert!(!is_valid_cnpj("11222333000180"));
        assert!(!is_valid_cnpj("11222333000191"));
    }

    #[test]
    fn cnpj_rejects_repeated_digits_and_lengths() {
        assert!(!is_valid_cnpj("00000000000000"));
        assert!(!is_valid_cnpj("77777777777777"));
        assert!(!is_valid_cnpj("1122233300018"));
        assert!(!is_valid_cnpj("112223330001810"));
        assert!(!is_valid_cnpj("not a cnpj"));
    }

    #[test]
    fn cnpj_weight_cycle() {
        // 12 digits all equal to one expose the weight sum directly:
        // 5+4+3+2+9+8+7+6+5+4+3+2 = 58, 58 % 11 = 3, check digit 8.
        assert_eq!(cnpj_check_digit(&[1; 12]), 8);
        // 13 digits: 6+5+4+3+2+9+8+7+6+5+4+3+2 = 64, 64 % 11 = 9, check digit 2.
        assert_eq!(cnpj_check_digit(&[1; 13]), 2);
    }

    #[test]
    fn document_dispatches_on_kind() {
        assert!(is_valid_document("11144477735", ClientKind::PF));
        assert!(!is_valid_document("11144477735", ClientKind::PJ));
        assert!(is_valid_document("11222333000181", ClientKind::PJ));
        assert!(!is_valid_document("11222333000181", ClientKind::PF));
    }

    #[test]
    fn digits_strips_everything_else() {
        assert_eq!(digits("(11) 99999-9999"), "11999999999");
        assert_eq!(digits("a1b2c3"), "123");
        assert_eq!(digits(""), "");
    }
}

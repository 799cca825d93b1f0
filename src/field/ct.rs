/// Constant-time equality.
///
/// Implementations must not branch or exit early on the compared data, so
/// that the time taken does not reveal where two values first differ.
pub trait ConstantTimeEq {
    /// Returns `true` if `self == other`, in constant time.
    fn ct_eq(&self, other: &Self) -> bool;
}

impl ConstantTimeEq for [u8; 32] {
    /// XORs every byte pair and folds the differences before a single test.
    #[inline(always)]
    fn ct_eq(&self, other: &Self) -> bool {
        self.iter()
            .zip(other)
            .map(|(a, b)| a ^ b)
            .fold(0, |acc, v| acc | v)
            == 0
    }
}

impl ConstantTimeEq for super::FieldElement {
    /// Compares canonical encodings; limb arrays are not unique.
    #[inline(always)]
    fn ct_eq(&self, other: &Self) -> bool {
        self.to_bytes().ct_eq(&other.to_bytes())
    }
}

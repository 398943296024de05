//! bcrypt password hashing

use bcrypt::BcryptError;

/// Hash a plaintext password at the given bcrypt cost
pub fn hash_password(password: &str, cost: u32) -> Result<String, BcryptError> {
    bcrypt::hash(password, cost)
}

/// Compare a plaintext password against a stored hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, BcryptError> {
    bcrypt::verify(password, hash)
}

use pbkdf2::pbkdf2_hmac_array;
use sha2::Sha256;

const PBKDF2_ROUNDS: u32 = 10_000;

/// 凭证密钥派生
///
/// 登录凭证是一个共享口令，不存在用户名。为了支持 O(1) 的登录点查询，
/// 密钥派生必须是确定性的：同一口令 + 同一 pepper 永远得到同一 key，
/// 数据库对 credentialKey 建唯一索引后即可直接命中。
pub fn derive_credential_key(password: &str, pepper: &str) -> String {
    let key = pbkdf2_hmac_array::<Sha256, 32>(password.trim().as_bytes(), pepper.as_bytes(), PBKDF2_ROUNDS);
    hex::encode(key)
}

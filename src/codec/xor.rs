/// Key used by `encrypt`/`decrypt`. Obfuscation only, not encryption.
pub const DEFAULT_KEY: u8 = 0x5A;

pub fn xor_transform(input: &[u8], key: u8) -> Vec<u8> {
    input.iter().map(|b| b ^ key).collect()
}

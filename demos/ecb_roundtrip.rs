use des_ecb::padding::pad;
use des_ecb::{Des, KeySource, RandomKeySource, ECB};

fn main() -> Result<(), des_ecb::Error> {
    let plaintext = b"Hello123Hello123Hello123111";

    let mode = ECB::new(Des)?;
    let key = RandomKeySource.key(mode.key_size())?;
    println!("Generated a {} byte DES key.", key.len());

    let padded = pad(plaintext, mode.block_size());
    println!("Plaintext: {} bytes, padded to {}", plaintext.len(), padded.len());

    let ciphertext = mode.encrypt(&padded, &key)?;
    for block in ciphertext.chunks(mode.block_size()) {
        println!("{:02X?}", block);
    }

    let decrypted = des_ecb::decrypt(&mode, &ciphertext, &key)?;
    println!("Decrypted: {}", String::from_utf8_lossy(&decrypted));
    assert_eq!(&decrypted[..], &plaintext[..]);
    Ok(())
}

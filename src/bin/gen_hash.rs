use std::{env, process};
use uuid::Uuid;

///Prints an argon2 encoded hash for the `[admin] password_hash` config key.
fn main() {
    let Some(password) = env::args().nth(1) else {
        eprintln!("usage: gen_hash <password>");
        process::exit(2);
    };
    let salt = Uuid::new_v4();
    match argon2::hash_encoded(
        password.as_bytes(),
        salt.as_bytes(),
        &argon2::Config::default(),
    ) {
        Ok(hash) => println!("{}", hash),
        Err(err) => {
            eprintln!("hashing failed: {}", err);
            process::exit(1);
        }
    }
}

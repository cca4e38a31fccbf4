use gatehouse::{
    config::Config,
    error::{AuthError, Error},
    invite_token::InviteTokenCodec,
};
use std::{env, path::Path, process};

///Mints a signed invite link for one invitee, using the signing secret and
///base URL from the server's own config file.
fn main() -> Result<(), Error> {
    let mut args = env::args().skip(1);
    let (Some(config_path), Some(email)) = (args.next(), args.next()) else {
        eprintln!("usage: make_invite <config.toml> <email> [code] [days]");
        process::exit(2);
    };
    let code = args.next().filter(|code| !code.trim().is_empty());
    let days: Option<i64> = args.next().and_then(|raw| raw.parse().ok());

    let config = Config::load(Path::new(&config_path))?;
    let codec = config
        .gate
        .invite_signing_secret
        .as_deref()
        .and_then(InviteTokenCodec::new)
        .ok_or(Error::Auth(AuthError::InviteSigningNotConfigured))?;
    let lifetime_seconds = match days {
        Some(days) => days * 24 * 60 * 60,
        None => config.gate.invite_lifetime_seconds,
    };

    let token = codec.issue(email.trim(), lifetime_seconds)?;
    let url = InviteTokenCodec::invite_url(&config.gate.invite_base_url, &token, code.as_deref());
    println!("{}", url);
    Ok(())
}

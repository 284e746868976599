//! Profile commands.

use forkful_core::ProfileDraft;

use super::CliError;
use crate::render;
use crate::session::Session;

/// Fields given on the command line; unset ones keep their current value.
#[derive(Debug, Default, clap::Args)]
pub struct ProfileArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub address_line1: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub state: Option<String>,
    #[arg(long)]
    pub country: Option<String>,
    #[arg(long)]
    pub zip_code: Option<String>,
}

impl ProfileArgs {
    fn apply(self, draft: &mut ProfileDraft) {
        let fields = [
            (self.name, &mut draft.name),
            (self.address_line1, &mut draft.address_line1),
            (self.city, &mut draft.city),
            (self.state, &mut draft.state),
            (self.country, &mut draft.country),
            (self.zip_code, &mut draft.zip_code),
        ];
        for (arg, field) in fields {
            if let Some(value) = arg {
                *field = value;
            }
        }
    }
}

/// Print the signed-in user's profile.
///
/// # Errors
///
/// Returns `CliError::Api` if the user cannot be loaded.
pub async fn show(session: &Session) -> Result<(), CliError> {
    let user = session.users.get_my_user().await?;
    render::print(session.format, &user, render::user);
    Ok(())
}

/// Update the profile, starting from the current values.
///
/// # Errors
///
/// Returns `CliError::Api` if loading, validation or saving fails.
pub async fn update(session: &Session, args: ProfileArgs) -> Result<(), CliError> {
    let current = session.users.get_my_user().await?;
    let mut draft = ProfileDraft::from_user(&current);
    args.apply(&mut draft);

    let updated = session.users.update_my_user(&draft).await?;
    if session.effects.take_reload() {
        return show(session).await;
    }
    render::print(session.format, &updated, render::user);
    Ok(())
}

use crate::cli::Command;
use crate::state::AppState;
use crate::users::handlers::{self, Render};

pub async fn run(state: &AppState, command: Command, out: &mut Render<'_>) -> anyhow::Result<()> {
    match command {
        Command::Initialize => handlers::initialize(state, out).await,
        Command::GetUser { username } => handlers::get_user(state, out, &username).await,
        Command::GetAllUsers => handlers::get_all_users(state, out).await,
        Command::ChangeEmail {
            username,
            new_email,
        } => handlers::change_email(state, out, &username, &new_email).await,
        Command::CreateUser {
            username,
            email,
            password,
        } => handlers::create_user(state, out, &username, &email, &password).await,
        Command::DeleteUser { username } => handlers::delete_user(state, out, &username).await,
        Command::SearchUser { query } => handlers::search_user(state, out, &query).await,
        Command::ListUsers(page) => handlers::list_users(state, out, page.into()).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::PageArgs;
    use crate::users::handlers::OutputFormat;

    async fn exec(state: &AppState, command: Command) -> String {
        let mut buf = Vec::new();
        run(state, command, &mut Render::new(&mut buf, OutputFormat::Text))
            .await
            .expect("command ok");
        String::from_utf8(buf).expect("utf8")
    }

    #[tokio::test]
    async fn initialize_then_lookup_scenario() {
        let state = AppState::in_memory().await;

        assert_eq!(exec(&state, Command::Initialize).await, "Database Initialized\n");
        assert_eq!(
            exec(&state, Command::GetUser { username: "bob".into() }).await,
            "id=1 username='bob' email='bob@mail.com' password='bobpass'\n"
        );
        assert_eq!(
            exec(
                &state,
                Command::CreateUser {
                    username: "bob".into(),
                    email: "x@y.com".into(),
                    password: "pw".into(),
                }
            )
            .await,
            "Username or email already taken!\n"
        );
        assert_eq!(
            exec(&state, Command::ListUsers(PageArgs { limit: 10, offset: 0 })).await,
            "id=1 username='bob' email='bob@mail.com' password='bobpass'\nShowing 1-1 of 1 users\n"
        );
    }
}

// Workout API endpoint functions.
// One method per endpoint; each is a single exchange with no retry.

use async_trait::async_trait;
use reqwest::Method;
use tracing::info;

use crate::error::Result;
use crate::session::Credential;

use super::WorkoutApi;
use super::client::{ApiClient, auth_failure, fetch_failure};
use super::types::{
    AuthRequest, RegisterConfirmation, Workout, WorkoutDraft, WorkoutId, parse_login,
    parse_register, parse_update, parse_workout, parse_workout_list,
};

pub const LOGIN_PATH: &str = "/users/login";
pub const REGISTER_PATH: &str = "/users/register";
pub const LIST_PATH: &str = "/workouts/getMyWorkouts";
pub const ADD_PATH: &str = "/workouts/addWorkout";

pub fn complete_path(id: &WorkoutId) -> String {
    format!("/workouts/completeWorkoutStatus/{}", id)
}

pub fn delete_path(id: &WorkoutId) -> String {
    format!("/workouts/deleteWorkout/{}", id)
}

pub fn update_path(id: &WorkoutId) -> String {
    format!("/workouts/updateWorkout/{}", id)
}

const LOGIN_FALLBACK: &str = "Login failed! Please check your credentials.";
const REGISTER_FALLBACK: &str = "Registration failed";

#[async_trait]
impl WorkoutApi for ApiClient {
    async fn login(&self, email: &str, password: &str) -> Result<Credential> {
        let request = self
            .request(Method::POST, LOGIN_PATH)
            .json(&AuthRequest { email, password });
        let response = self.dispatch(request).await?;
        if !response.is_success() {
            return Err(auth_failure(&response, LOGIN_FALLBACK));
        }
        info!("login accepted");
        parse_login(&response.body)
    }

    async fn register(&self, email: &str, password: &str) -> Result<RegisterConfirmation> {
        let request = self
            .request(Method::POST, REGISTER_PATH)
            .json(&AuthRequest { email, password });
        let response = self.dispatch(request).await?;
        if !response.is_success() {
            return Err(auth_failure(&response, REGISTER_FALLBACK));
        }
        info!("registration accepted");
        Ok(parse_register(&response.body))
    }

    async fn list_workouts(&self, credential: &Credential) -> Result<Vec<Workout>> {
        let request = self.authorized(Method::GET, LIST_PATH, credential)?;
        let response = self.dispatch(request).await?;
        if !response.is_success() {
            return Err(fetch_failure(&response, "fetch workouts"));
        }
        parse_workout_list(&response.body)
    }

    async fn add_workout(&self, credential: &Credential, draft: &WorkoutDraft) -> Result<Workout> {
        let request = self
            .authorized(Method::POST, ADD_PATH, credential)?
            .json(draft);
        let response = self.dispatch(request).await?;
        if !response.is_success() {
            return Err(fetch_failure(&response, "add workout"));
        }
        parse_workout(&response.body)
    }

    async fn update_workout(
        &self,
        credential: &Credential,
        id: &WorkoutId,
        draft: &WorkoutDraft,
    ) -> Result<Option<Workout>> {
        let request = self
            .authorized(Method::PATCH, &update_path(id), credential)?
            .json(draft);
        let response = self.dispatch(request).await?;
        if !response.is_success() {
            return Err(fetch_failure(&response, "update workout"));
        }
        parse_update(&response.body)
    }

    async fn delete_workout(&self, credential: &Credential, id: &WorkoutId) -> Result<()> {
        let request = self.authorized(Method::DELETE, &delete_path(id), credential)?;
        let response = self.dispatch(request).await?;
        if !response.is_success() {
            return Err(fetch_failure(&response, "delete workout"));
        }
        Ok(())
    }

    async fn mark_workout_done(&self, credential: &Credential, id: &WorkoutId) -> Result<()> {
        let request = self.authorized(Method::PATCH, &complete_path(id), credential)?;
        let response = self.dispatch(request).await?;
        if !response.is_success() {
            return Err(fetch_failure(&response, "update workout status"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FitlogError;
    use crate::session::credential::UserRecord;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    /// Serve exactly one HTTP exchange on a local port. The handle yields the raw
    /// request text as the server received it.
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (ApiClient, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            request
        });

        (ApiClient::new(&base_url).unwrap(), handle)
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf);
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        if name.eq_ignore_ascii_case("content-length") {
                            value.trim().parse::<usize>().ok()
                        } else {
                            None
                        }
                    })
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn request_line(request: &str) -> &str {
        request.lines().next().unwrap_or("")
    }

    #[tokio::test]
    async fn test_login_over_http() {
        let (client, server) = serve_once("200 OK", r#"{"access":"tok123"}"#).await;

        let credential = client.login("a@b.com", "secret1").await.unwrap();
        assert_eq!(credential, Credential::token("tok123"));

        let request = server.await.unwrap();
        assert_eq!(request_line(&request), "POST /users/login HTTP/1.1");
        assert!(request.contains(r#""email":"a@b.com""#));
        assert!(request.contains(r#""password":"secret1""#));
        assert!(!request.to_lowercase().contains("authorization:"));
    }

    #[tokio::test]
    async fn test_rejected_login_uses_server_message() {
        let (client, server) =
            serve_once("401 Unauthorized", r#"{"message":"Invalid email or password"}"#).await;

        let err = client.login("a@b.com", "wrong12").await.unwrap_err();
        assert!(matches!(err, FitlogError::Authentication(_)));
        assert_eq!(err.to_string(), "Invalid email or password");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_list_over_http_sends_bearer() {
        let (client, server) = serve_once(
            "200 OK",
            r#"{"workouts":[{"_id":"1","name":"Run","duration":"30 mins","status":"completed"}]}"#,
        )
        .await;

        let workouts = client
            .list_workouts(&Credential::token("tok123"))
            .await
            .unwrap();
        assert_eq!(workouts.len(), 1);
        assert_eq!(workouts[0].id, WorkoutId::new("1"));
        assert!(workouts[0].completed);

        let request = server.await.unwrap();
        assert_eq!(request_line(&request), "GET /workouts/getMyWorkouts HTTP/1.1");
        assert!(request.to_lowercase().contains("authorization: bearer tok123"));
    }

    #[tokio::test]
    async fn test_delete_not_found_over_http() {
        let (client, server) = serve_once("404 Not Found", "").await;

        let err = client
            .delete_workout(&Credential::token("tok123"), &WorkoutId::new("66f1"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to delete workout: Not Found");

        let request = server.await.unwrap();
        assert_eq!(
            request_line(&request),
            "DELETE /workouts/deleteWorkout/66f1 HTTP/1.1"
        );
    }

    #[tokio::test]
    async fn test_message_only_update_over_http() {
        let (client, server) =
            serve_once("200 OK", r#"{"message":"Workout updated successfully"}"#).await;

        let updated = client
            .update_workout(
                &Credential::token("tok123"),
                &WorkoutId::new("1"),
                &WorkoutDraft::new("Run", "40 mins"),
            )
            .await
            .unwrap();
        assert_eq!(updated, None);

        let request = server.await.unwrap();
        assert_eq!(request_line(&request), "PATCH /workouts/updateWorkout/1 HTTP/1.1");
        assert!(request.contains(r#""duration":"40 mins""#));
    }

    #[tokio::test]
    async fn test_message_only_update_keeps_done_workout_done() {
        use crate::api::fake::workout;
        use crate::session::{MemoryStorage, SESSION_KEY, SessionStore};
        use crate::state::{WorkoutOutcome, WorkoutsController};

        let session = SessionStore::open(MemoryStorage::with_value(SESSION_KEY, "\"tok123\""));
        let mut view = WorkoutsController::new();
        view.mount(&session);
        view.complete(Ok(WorkoutOutcome::Listed(vec![workout("1", "Run", "30 mins", true)])));

        let (client, server) =
            serve_once("200 OK", r#"{"message":"Workout updated successfully"}"#).await;
        assert!(view.begin_edit());
        view.edit.as_mut().unwrap().form.set_value(1, "40 mins");
        let request = view.submit_edit().unwrap();
        view.perform(&client, request).await;
        server.await.unwrap();

        assert_eq!(view.workouts(), &[workout("1", "Run", "40 mins", true)]);
    }

    #[tokio::test]
    async fn test_mark_done_over_http() {
        let (client, server) = serve_once("200 OK", r#"{"message":"ok"}"#).await;

        client
            .mark_workout_done(&Credential::token("tok123"), &WorkoutId::new("9"))
            .await
            .unwrap();

        let request = server.await.unwrap();
        assert_eq!(
            request_line(&request),
            "PATCH /workouts/completeWorkoutStatus/9 HTTP/1.1"
        );
    }

    #[test]
    fn test_paths() {
        let id = WorkoutId::new("66f1");
        assert_eq!(complete_path(&id), "/workouts/completeWorkoutStatus/66f1");
        assert_eq!(delete_path(&id), "/workouts/deleteWorkout/66f1");
        assert_eq!(update_path(&id), "/workouts/updateWorkout/66f1");
    }

    #[tokio::test]
    async fn test_calls_without_token_fail_before_network() {
        // Port 9 (discard) would refuse or hang; the call must never get that far.
        let client = ApiClient::new("http://127.0.0.1:9").unwrap();
        let anonymous = Credential::User(UserRecord {
            email: "a@b.com".to_string(),
            access: None,
            extra: Default::default(),
        });
        let id = WorkoutId::new("1");

        assert!(matches!(
            client.list_workouts(&anonymous).await,
            Err(FitlogError::NotAuthenticated)
        ));
        assert!(matches!(
            client.delete_workout(&anonymous, &id).await,
            Err(FitlogError::NotAuthenticated)
        ));
        assert!(matches!(
            client.mark_workout_done(&anonymous, &id).await,
            Err(FitlogError::NotAuthenticated)
        ));
        assert!(matches!(
            client
                .add_workout(&anonymous, &WorkoutDraft::new("Run", "30 mins"))
                .await,
            Err(FitlogError::NotAuthenticated)
        ));
    }
}

use tracing::debug;

use vidsage_api::{
    AuthResponse, ChatMessageRequest, ChatMessageResponse, ChatStartRequest, ChatStartResponse,
    HealthResponse, ProcessVideoResponse, ServiceStatusResponse, SignInRequest, SignUpRequest,
    VideoHistoryResponse, VideoSource,
};
use vidsage_core::config::AppConfig;

/// Commands that require async I/O (network calls).
#[derive(Debug)]
pub enum AsyncCommand {
    CheckHealth,
    FetchServiceStatus,
    SignIn {
        email: String,
        password: String,
    },
    SignUp {
        email: String,
        password: String,
    },
    ProcessVideo {
        source: VideoSource,
    },
    FetchHistory {
        limit: usize,
    },
    FetchVideoDetails {
        video_id: String,
    },
    StartChatSession {
        video_id: String,
    },
    SendChatMessage {
        session_id: String,
        question: String,
        keyframe_ids: Option<Vec<u32>>,
    },
}

/// Results returned by async commands.
#[derive(Debug)]
pub enum CommandResult {
    Health(Result<HealthResponse, String>),
    ServiceStatus(Result<ServiceStatusResponse, String>),
    Auth(Result<AuthResponse, String>),
    VideoProcessed(Result<ProcessVideoResponse, String>),
    History(Result<VideoHistoryResponse, String>),
    VideoDetails(Result<ProcessVideoResponse, String>),
    ChatStarted {
        video_id: String,
        result: Result<ChatStartResponse, String>,
    },
    ChatAnswer(Result<ChatMessageResponse, String>),
}

fn make_client(config: &AppConfig) -> vidsage_api_client::ApiClient {
    let mut client = vidsage_api_client::ApiClient::new(&config.server.url);
    if !config.server.access_token.is_empty() {
        client.set_token(config.server.access_token.clone());
    }
    client
}

pub async fn execute(cmd: AsyncCommand, config: &AppConfig) -> CommandResult {
    let client = make_client(config);
    match cmd {
        AsyncCommand::CheckHealth => {
            CommandResult::Health(client.health().await.map_err(|e| e.to_string()))
        }

        AsyncCommand::FetchServiceStatus => CommandResult::ServiceStatus(
            client.service_status().await.map_err(|e| e.to_string()),
        ),

        AsyncCommand::SignIn { email, password } => CommandResult::Auth(
            client
                .sign_in(&SignInRequest { email, password })
                .await
                .map_err(|e| e.to_string()),
        ),

        AsyncCommand::SignUp { email, password } => CommandResult::Auth(
            client
                .sign_up(&SignUpRequest {
                    email,
                    password,
                    username: None,
                })
                .await
                .map_err(|e| e.to_string()),
        ),

        AsyncCommand::ProcessVideo { source } => {
            debug!(source = %source.label(), "dispatching video for processing");
            CommandResult::VideoProcessed(
                client.process_video(&source).await.map_err(|e| e.to_string()),
            )
        }

        AsyncCommand::FetchHistory { limit } => {
            CommandResult::History(client.video_history(limit).await.map_err(|e| e.to_string()))
        }

        AsyncCommand::FetchVideoDetails { video_id } => CommandResult::VideoDetails(
            client
                .video_details(&video_id)
                .await
                .map_err(|e| e.to_string()),
        ),

        AsyncCommand::StartChatSession { video_id } => {
            let result = client
                .start_chat(&ChatStartRequest {
                    video_id: video_id.clone(),
                })
                .await
                .map_err(|e| e.to_string());
            CommandResult::ChatStarted { video_id, result }
        }

        AsyncCommand::SendChatMessage {
            session_id,
            question,
            keyframe_ids,
        } => CommandResult::ChatAnswer(
            client
                .send_chat_message(&ChatMessageRequest::new(session_id, question, keyframe_ids))
                .await
                .map_err(|e| e.to_string()),
        ),
    }
}

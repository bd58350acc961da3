//! Chat handlers

use axum::{extract::State, Json};
use forum_service::dto::{
    ChatMessageResponse, ChatMessagesResponse, ChatResponse, MessageResponse, SendMessageRequest,
    StartChatRequest, UnreadCountResponse,
};
use forum_service::ChatService;

use crate::extractors::{AuthUser, ChatIdPath, ChatMessagePath, Pagination, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// GET /chats
pub async fn list_chats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<ChatResponse>>> {
    let service = ChatService::new(state.service_context());
    Ok(Json(service.list(auth.user_id()).await?))
}

/// Open the chat with a user, reusing an existing one
///
/// POST /chats
pub async fn start_chat(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<StartChatRequest>,
) -> ApiResult<Json<ChatResponse>> {
    let service = ChatService::new(state.service_context());
    Ok(Json(service.start(&auth.identity, request).await?))
}

/// GET /chats/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<UnreadCountResponse>> {
    let service = ChatService::new(state.service_context());
    Ok(Json(service.unread_count(auth.user_id()).await?))
}

/// GET /chats/{chat_id}/messages?before=&limit=
pub async fn list_messages(
    State(state): State<AppState>,
    auth: AuthUser,
    path: ChatIdPath,
    Pagination(page): Pagination,
) -> ApiResult<Json<ChatMessagesResponse>> {
    let service = ChatService::new(state.service_context());
    Ok(Json(
        service
            .messages(auth.user_id(), path.chat_id()?, page)
            .await?,
    ))
}

/// POST /chats/{chat_id}/messages
pub async fn send_message(
    State(state): State<AppState>,
    auth: AuthUser,
    path: ChatIdPath,
    ValidatedJson(request): ValidatedJson<SendMessageRequest>,
) -> ApiResult<Created<Json<ChatMessageResponse>>> {
    let service = ChatService::new(state.service_context());
    let message = service
        .send(&auth.identity, path.chat_id()?, request)
        .await?;
    Ok(Created(Json(message)))
}

/// POST /chats/{chat_id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    path: ChatIdPath,
) -> ApiResult<Json<MessageResponse>> {
    let service = ChatService::new(state.service_context());
    Ok(Json(service.mark_read(auth.user_id(), path.chat_id()?).await?))
}

/// DELETE /chats/{chat_id}/messages/{message_id}
pub async fn delete_message(
    State(state): State<AppState>,
    auth: AuthUser,
    path: ChatMessagePath,
) -> ApiResult<Json<MessageResponse>> {
    let service = ChatService::new(state.service_context());
    Ok(Json(
        service
            .delete_message(auth.user_id(), path.chat_id()?, path.message_id()?)
            .await?,
    ))
}

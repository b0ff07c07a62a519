//! Shared test support: in-memory repository implementations over a single
//! mutex-guarded store (so the atomic redemption contract holds the same
//! way a database transaction does), a recording notification sink, and
//! fixture helpers.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use uuid::Uuid;

use talk_common::InviteConfig;
use talk_core::entities::{
    Chat, ChatMember, ChatType, InviteLink, Message, Reaction, ReactionCount, ReactionType, User,
};
use talk_core::error::DomainError;
use talk_core::events::DomainEvent;
use talk_core::traits::{
    ChatRepository, InviteLinkRepository, MemberRepository, MessageQuery, MessageRepository,
    NotificationSink, ReactionRepository, RedeemOutcome, RepoResult, UserRepository,
};
use talk_core::value_objects::ChatRole;
use talk_core::InviteCodeGenerator;
use talk_service::{ServiceContext, ServiceContextBuilder, ServiceError};

// ============================================================================
// In-memory store
// ============================================================================

#[derive(Default)]
struct State {
    users: HashMap<Uuid, User>,
    chats: HashMap<Uuid, Chat>,
    members: HashMap<(Uuid, Uuid), ChatMember>,
    messages: HashMap<Uuid, Message>,
    reactions: Vec<Reaction>,
    invites: HashMap<Uuid, InviteLink>,
}

/// One shared store behind a mutex; every repository handle is a view onto
/// the same state, mirroring tables in one database.
#[derive(Clone, Default)]
pub struct MemStore {
    state: Arc<Mutex<State>>,
}

impl MemStore {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("store poisoned")
    }

    pub fn insert_user(&self, user: User) {
        self.lock().users.insert(user.id, user);
    }

    pub fn insert_chat(&self, chat: Chat) {
        self.lock().chats.insert(chat.id, chat);
    }

    pub fn insert_member(&self, member: ChatMember) {
        self.lock()
            .members
            .insert((member.chat_id, member.user_id), member);
    }

    pub fn invite(&self, id: Uuid) -> Option<InviteLink> {
        self.lock().invites.get(&id).cloned()
    }

    pub fn invite_by_code(&self, code: &str) -> Option<InviteLink> {
        self.lock().invites.values().find(|l| l.code == code).cloned()
    }

    pub fn member(&self, chat_id: Uuid, user_id: Uuid) -> Option<ChatMember> {
        self.lock().members.get(&(chat_id, user_id)).cloned()
    }

    pub fn member_count(&self, chat_id: Uuid) -> usize {
        self.lock()
            .members
            .keys()
            .filter(|(c, _)| *c == chat_id)
            .count()
    }

    pub fn invite_count(&self) -> usize {
        self.lock().invites.len()
    }
}

// ============================================================================
// Repository implementations
// ============================================================================

#[derive(Clone)]
pub struct MemUserRepository(MemStore);

#[async_trait]
impl UserRepository for MemUserRepository {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<User>> {
        Ok(self.0.lock().users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        Ok(self
            .0
            .lock()
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn create(&self, user: &User) -> RepoResult<()> {
        self.0.lock().users.insert(user.id, user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> RepoResult<()> {
        let mut state = self.0.lock();
        if !state.users.contains_key(&user.id) {
            return Err(DomainError::UserNotFound(user.id));
        }
        state.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn touch_presence(&self, id: Uuid, online: bool) -> RepoResult<()> {
        let mut state = self.0.lock();
        let user = state
            .users
            .get_mut(&id)
            .ok_or(DomainError::UserNotFound(id))?;
        user.touch_presence(online);
        Ok(())
    }
}

#[derive(Clone)]
pub struct MemChatRepository(MemStore);

#[async_trait]
impl ChatRepository for MemChatRepository {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Chat>> {
        Ok(self.0.lock().chats.get(&id).cloned())
    }

    async fn find_by_user(&self, user_id: Uuid) -> RepoResult<Vec<Chat>> {
        let state = self.0.lock();
        let mut chats: Vec<Chat> = state
            .chats
            .values()
            .filter(|c| state.members.contains_key(&(c.id, user_id)))
            .cloned()
            .collect();
        chats.sort_by(|a, b| b.last_activity_at.cmp(&a.last_activity_at));
        Ok(chats)
    }

    async fn create(&self, chat: &Chat) -> RepoResult<()> {
        self.0.lock().chats.insert(chat.id, chat.clone());
        Ok(())
    }

    async fn update(&self, chat: &Chat) -> RepoResult<()> {
        let mut state = self.0.lock();
        if !state.chats.contains_key(&chat.id) {
            return Err(DomainError::ChatNotFound(chat.id));
        }
        state.chats.insert(chat.id, chat.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let mut state = self.0.lock();
        state
            .chats
            .remove(&id)
            .ok_or(DomainError::ChatNotFound(id))?;
        state.members.retain(|(chat_id, _), _| *chat_id != id);
        state.invites.retain(|_, l| l.chat_id != id);
        Ok(())
    }

    async fn touch_activity(&self, id: Uuid) -> RepoResult<()> {
        if let Some(chat) = self.0.lock().chats.get_mut(&id) {
            chat.touch_activity();
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct MemMemberRepository(MemStore);

#[async_trait]
impl MemberRepository for MemMemberRepository {
    async fn find(&self, chat_id: Uuid, user_id: Uuid) -> RepoResult<Option<ChatMember>> {
        Ok(self.0.lock().members.get(&(chat_id, user_id)).cloned())
    }

    async fn find_by_chat(&self, chat_id: Uuid) -> RepoResult<Vec<ChatMember>> {
        let state = self.0.lock();
        let mut members: Vec<ChatMember> = state
            .members
            .values()
            .filter(|m| m.chat_id == chat_id)
            .cloned()
            .collect();
        members.sort_by_key(|m| m.joined_at);
        Ok(members)
    }

    async fn is_member(&self, chat_id: Uuid, user_id: Uuid) -> RepoResult<bool> {
        Ok(self.0.lock().members.contains_key(&(chat_id, user_id)))
    }

    async fn role_of(&self, chat_id: Uuid, user_id: Uuid) -> RepoResult<Option<ChatRole>> {
        Ok(self
            .0
            .lock()
            .members
            .get(&(chat_id, user_id))
            .map(|m| m.role))
    }

    async fn count_by_chat(&self, chat_id: Uuid) -> RepoResult<i64> {
        Ok(self.0.member_count(chat_id) as i64)
    }

    async fn create(&self, member: &ChatMember) -> RepoResult<()> {
        let mut state = self.0.lock();
        let key = (member.chat_id, member.user_id);
        if state.members.contains_key(&key) {
            return Err(DomainError::AlreadyMember);
        }
        state.members.insert(key, member.clone());
        Ok(())
    }

    async fn update_role(&self, chat_id: Uuid, user_id: Uuid, role: ChatRole) -> RepoResult<()> {
        let mut state = self.0.lock();
        let member = state
            .members
            .get_mut(&(chat_id, user_id))
            .ok_or(DomainError::MemberNotFound)?;
        member.role = role;
        Ok(())
    }

    async fn update_last_read(&self, chat_id: Uuid, user_id: Uuid) -> RepoResult<()> {
        let mut state = self.0.lock();
        let member = state
            .members
            .get_mut(&(chat_id, user_id))
            .ok_or(DomainError::MemberNotFound)?;
        member.mark_read();
        Ok(())
    }

    async fn delete(&self, chat_id: Uuid, user_id: Uuid) -> RepoResult<()> {
        self.0
            .lock()
            .members
            .remove(&(chat_id, user_id))
            .ok_or(DomainError::MemberNotFound)?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct MemMessageRepository(MemStore);

#[async_trait]
impl MessageRepository for MemMessageRepository {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Message>> {
        Ok(self
            .0
            .lock()
            .messages
            .get(&id)
            .filter(|m| !m.is_deleted)
            .cloned())
    }

    async fn find_by_chat(&self, chat_id: Uuid, query: MessageQuery) -> RepoResult<Vec<Message>> {
        let state = self.0.lock();
        let mut messages: Vec<Message> = state
            .messages
            .values()
            .filter(|m| m.chat_id == chat_id && !m.is_deleted)
            .filter(|m| query.before.is_none_or(|before| m.created_at < before))
            .cloned()
            .collect();
        messages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        messages.truncate(query.limit.clamp(1, 100) as usize);
        Ok(messages)
    }

    async fn create(&self, message: &Message) -> RepoResult<()> {
        self.0.lock().messages.insert(message.id, message.clone());
        Ok(())
    }

    async fn update(&self, message: &Message) -> RepoResult<()> {
        let mut state = self.0.lock();
        if !state.messages.contains_key(&message.id) {
            return Err(DomainError::MessageNotFound(message.id));
        }
        state.messages.insert(message.id, message.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let mut state = self.0.lock();
        let message = state
            .messages
            .get_mut(&id)
            .ok_or(DomainError::MessageNotFound(id))?;
        message.is_deleted = true;
        Ok(())
    }
}

#[derive(Clone)]
pub struct MemReactionRepository(MemStore);

#[async_trait]
impl ReactionRepository for MemReactionRepository {
    async fn find(
        &self,
        message_id: Uuid,
        user_id: Uuid,
        reaction_type: ReactionType,
    ) -> RepoResult<Option<Reaction>> {
        Ok(self
            .0
            .lock()
            .reactions
            .iter()
            .find(|r| {
                r.message_id == message_id
                    && r.user_id == user_id
                    && r.reaction_type == reaction_type
            })
            .cloned())
    }

    async fn find_by_message(&self, message_id: Uuid) -> RepoResult<Vec<Reaction>> {
        Ok(self
            .0
            .lock()
            .reactions
            .iter()
            .filter(|r| r.message_id == message_id)
            .cloned()
            .collect())
    }

    async fn create(&self, reaction: &Reaction) -> RepoResult<()> {
        let mut state = self.0.lock();
        let duplicate = state.reactions.iter().any(|r| {
            r.message_id == reaction.message_id
                && r.user_id == reaction.user_id
                && r.reaction_type == reaction.reaction_type
        });
        if duplicate {
            return Err(DomainError::ReactionAlreadyExists);
        }
        state.reactions.push(reaction.clone());
        Ok(())
    }

    async fn delete(
        &self,
        message_id: Uuid,
        user_id: Uuid,
        reaction_type: ReactionType,
    ) -> RepoResult<()> {
        let mut state = self.0.lock();
        let before = state.reactions.len();
        state.reactions.retain(|r| {
            !(r.message_id == message_id
                && r.user_id == user_id
                && r.reaction_type == reaction_type)
        });
        if state.reactions.len() == before {
            return Err(DomainError::ReactionNotFound);
        }
        Ok(())
    }

    async fn counts_by_message(&self, message_id: Uuid) -> RepoResult<Vec<ReactionCount>> {
        let state = self.0.lock();
        let mut counts: HashMap<ReactionType, i64> = HashMap::new();
        for reaction in state.reactions.iter().filter(|r| r.message_id == message_id) {
            *counts.entry(reaction.reaction_type).or_insert(0) += 1;
        }
        let mut result: Vec<ReactionCount> = counts
            .into_iter()
            .map(|(reaction_type, count)| ReactionCount {
                reaction_type,
                count,
            })
            .collect();
        result.sort_by_key(|c| c.reaction_type.rank());
        Ok(result)
    }
}

#[derive(Clone)]
pub struct MemInviteLinkRepository(MemStore);

#[async_trait]
impl InviteLinkRepository for MemInviteLinkRepository {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<InviteLink>> {
        Ok(self.0.invite(id))
    }

    async fn find_by_code(&self, code: &str) -> RepoResult<Option<InviteLink>> {
        Ok(self.0.invite_by_code(code))
    }

    async fn find_active_by_chat(&self, chat_id: Uuid) -> RepoResult<Vec<InviteLink>> {
        let state = self.0.lock();
        let mut links: Vec<InviteLink> = state
            .invites
            .values()
            .filter(|l| l.chat_id == chat_id && l.is_active && !l.is_suspended && !l.is_blocked)
            .cloned()
            .collect();
        links.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(links)
    }

    async fn find_all_by_chat(&self, chat_id: Uuid) -> RepoResult<Vec<InviteLink>> {
        let state = self.0.lock();
        let mut links: Vec<InviteLink> = state
            .invites
            .values()
            .filter(|l| l.chat_id == chat_id)
            .cloned()
            .collect();
        links.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(links)
    }

    async fn create(&self, link: &InviteLink) -> RepoResult<()> {
        let mut state = self.0.lock();
        if state.invites.values().any(|l| l.code == link.code) {
            return Err(DomainError::InviteCodeExists);
        }
        state.invites.insert(link.id, link.clone());
        Ok(())
    }

    async fn update(&self, link: &InviteLink) -> RepoResult<InviteLink> {
        let mut state = self.0.lock();
        let stored = state
            .invites
            .get_mut(&link.id)
            .ok_or_else(|| DomainError::InviteNotFound(link.id.to_string()))?;
        stored.expires_at = link.expires_at;
        stored.usage_limit = link.usage_limit;
        stored.is_active = link.is_active;
        Ok(stored.clone())
    }

    async fn deactivate(&self, id: Uuid) -> RepoResult<()> {
        let mut state = self.0.lock();
        let stored = state
            .invites
            .get_mut(&id)
            .ok_or_else(|| DomainError::InviteNotFound(id.to_string()))?;
        stored.is_active = false;
        Ok(())
    }

    async fn suspend(
        &self,
        id: Uuid,
        suspended_by: Uuid,
        reason: Option<&str>,
    ) -> RepoResult<InviteLink> {
        let mut state = self.0.lock();
        let stored = state
            .invites
            .get_mut(&id)
            .ok_or_else(|| DomainError::InviteNotFound(id.to_string()))?;
        stored.is_suspended = true;
        stored.suspended_by = Some(suspended_by);
        stored.suspended_at = Some(chrono::Utc::now());
        stored.suspension_reason = reason.map(str::to_string);
        Ok(stored.clone())
    }

    async fn unsuspend(&self, id: Uuid) -> RepoResult<InviteLink> {
        let mut state = self.0.lock();
        let stored = state
            .invites
            .get_mut(&id)
            .ok_or_else(|| DomainError::InviteNotFound(id.to_string()))?;
        stored.is_suspended = false;
        stored.suspended_by = None;
        stored.suspended_at = None;
        stored.suspension_reason = None;
        Ok(stored.clone())
    }

    async fn block(&self, id: Uuid, blocked_by: Uuid) -> RepoResult<InviteLink> {
        let mut state = self.0.lock();
        let stored = state
            .invites
            .get_mut(&id)
            .ok_or_else(|| DomainError::InviteNotFound(id.to_string()))?;
        stored.is_blocked = true;
        stored.suspended_by = Some(blocked_by);
        stored.suspended_at = Some(chrono::Utc::now());
        Ok(stored.clone())
    }

    async fn unblock(&self, id: Uuid) -> RepoResult<InviteLink> {
        let mut state = self.0.lock();
        let stored = state
            .invites
            .get_mut(&id)
            .ok_or_else(|| DomainError::InviteNotFound(id.to_string()))?;
        stored.is_blocked = false;
        if !stored.is_suspended {
            stored.suspended_by = None;
            stored.suspended_at = None;
        }
        Ok(stored.clone())
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        self.0
            .lock()
            .invites
            .remove(&id)
            .ok_or_else(|| DomainError::InviteNotFound(id.to_string()))?;
        Ok(())
    }

    /// Same contract as the transactional implementation: the whole
    /// check-then-act sequence runs under one lock.
    async fn redeem(&self, code: &str, user_id: Uuid) -> RepoResult<RedeemOutcome> {
        let mut state = self.0.lock();

        let link = state
            .invites
            .values()
            .find(|l| l.code == code)
            .cloned()
            .ok_or_else(|| DomainError::InviteNotFound(code.to_string()))?;

        if let Some(existing) = state.members.get(&(link.chat_id, user_id)) {
            return Ok(RedeemOutcome {
                membership: existing.clone(),
                newly_joined: false,
            });
        }

        if !link.is_redeemable() {
            return Err(DomainError::InviteNotRedeemable);
        }

        let member = ChatMember::new(link.chat_id, user_id, ChatRole::Member);
        state.members.insert((link.chat_id, user_id), member.clone());
        if let Some(stored) = state.invites.get_mut(&link.id) {
            stored.used_count += 1;
        }

        Ok(RedeemOutcome {
            membership: member,
            newly_joined: true,
        })
    }
}

/// Wrapper that fails the first N redemption attempts with a race, to
/// exercise the engine's bounded retry loop.
pub struct FlakyInviteRepository {
    inner: MemInviteLinkRepository,
    races: AtomicU32,
}

impl FlakyInviteRepository {
    pub fn new(store: MemStore, races: u32) -> Self {
        Self {
            inner: MemInviteLinkRepository(store),
            races: AtomicU32::new(races),
        }
    }
}

#[async_trait]
impl InviteLinkRepository for FlakyInviteRepository {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<InviteLink>> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_code(&self, code: &str) -> RepoResult<Option<InviteLink>> {
        self.inner.find_by_code(code).await
    }

    async fn find_active_by_chat(&self, chat_id: Uuid) -> RepoResult<Vec<InviteLink>> {
        self.inner.find_active_by_chat(chat_id).await
    }

    async fn find_all_by_chat(&self, chat_id: Uuid) -> RepoResult<Vec<InviteLink>> {
        self.inner.find_all_by_chat(chat_id).await
    }

    async fn create(&self, link: &InviteLink) -> RepoResult<()> {
        self.inner.create(link).await
    }

    async fn update(&self, link: &InviteLink) -> RepoResult<InviteLink> {
        self.inner.update(link).await
    }

    async fn deactivate(&self, id: Uuid) -> RepoResult<()> {
        self.inner.deactivate(id).await
    }

    async fn suspend(
        &self,
        id: Uuid,
        suspended_by: Uuid,
        reason: Option<&str>,
    ) -> RepoResult<InviteLink> {
        self.inner.suspend(id, suspended_by, reason).await
    }

    async fn unsuspend(&self, id: Uuid) -> RepoResult<InviteLink> {
        self.inner.unsuspend(id).await
    }

    async fn block(&self, id: Uuid, blocked_by: Uuid) -> RepoResult<InviteLink> {
        self.inner.block(id, blocked_by).await
    }

    async fn unblock(&self, id: Uuid) -> RepoResult<InviteLink> {
        self.inner.unblock(id).await
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        self.inner.delete(id).await
    }

    async fn redeem(&self, code: &str, user_id: Uuid) -> RepoResult<RedeemOutcome> {
        if self
            .races
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(DomainError::RedemptionRace);
        }
        self.inner.redeem(code, user_id).await
    }
}

// ============================================================================
// Notification capture
// ============================================================================

/// Sink that records every event it receives
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<DomainEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<DomainEvent> {
        self.events.lock().expect("sink poisoned").clone()
    }

    pub fn count_of(&self, event_type: &str) -> usize {
        self.events()
            .iter()
            .filter(|e| e.event_type() == event_type)
            .count()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn notify(&self, event: DomainEvent) {
        self.events.lock().expect("sink poisoned").push(event);
    }
}

// ============================================================================
// Harness and fixtures
// ============================================================================

pub struct TestHarness {
    pub ctx: ServiceContext,
    pub store: MemStore,
    pub events: Arc<RecordingSink>,
}

/// Harness with default invite configuration
pub fn harness() -> TestHarness {
    harness_with_config(InviteConfig::default())
}

/// Harness with custom invite configuration
pub fn harness_with_config(config: InviteConfig) -> TestHarness {
    let store = MemStore::default();
    let events = Arc::new(RecordingSink::default());
    let invite_repo: Arc<dyn InviteLinkRepository> =
        Arc::new(MemInviteLinkRepository(store.clone()));
    let ctx = build_context(&store, events.clone(), invite_repo, config);
    TestHarness { ctx, store, events }
}

/// Harness whose invite repository fakes `races` redemption races before
/// delegating to the real store
pub fn harness_with_flaky_redeem(races: u32) -> TestHarness {
    let store = MemStore::default();
    let events = Arc::new(RecordingSink::default());
    let invite_repo: Arc<dyn InviteLinkRepository> =
        Arc::new(FlakyInviteRepository::new(store.clone(), races));
    let ctx = build_context(&store, events.clone(), invite_repo, InviteConfig::default());
    TestHarness { ctx, store, events }
}

fn build_context(
    store: &MemStore,
    events: Arc<RecordingSink>,
    invite_repo: Arc<dyn InviteLinkRepository>,
    config: InviteConfig,
) -> ServiceContext {
    ServiceContextBuilder::new()
        .user_repo(Arc::new(MemUserRepository(store.clone())))
        .chat_repo(Arc::new(MemChatRepository(store.clone())))
        .member_repo(Arc::new(MemMemberRepository(store.clone())))
        .message_repo(Arc::new(MemMessageRepository(store.clone())))
        .reaction_repo(Arc::new(MemReactionRepository(store.clone())))
        .invite_repo(invite_repo)
        .notifier(events)
        .code_generator(Arc::new(InviteCodeGenerator::from_seed(7)))
        .invite_config(config)
        .build()
        .expect("context wiring")
}

impl TestHarness {
    pub fn seed_user(&self, name: &str) -> User {
        let user = User::new(name.to_string(), format!("{name}@example.com"));
        self.store.insert_user(user.clone());
        user
    }

    /// Group chat with the given owner already a member
    pub fn seed_chat(&self, owner: &User) -> Chat {
        let chat = Chat::new("fika".to_string(), ChatType::Group, owner.id);
        self.store.insert_chat(chat.clone());
        self.store
            .insert_member(ChatMember::new(chat.id, owner.id, ChatRole::Owner));
        chat
    }

    pub fn seed_member(&self, chat: &Chat, user: &User, role: ChatRole) {
        self.store
            .insert_member(ChatMember::new(chat.id, user.id, role));
    }
}

// ============================================================================
// Assertion helpers
// ============================================================================

pub fn is_invalid_or_expired(err: &ServiceError) -> bool {
    matches!(
        err,
        ServiceError::Domain(DomainError::InviteNotRedeemable)
    )
}

pub fn is_forbidden(err: &ServiceError) -> bool {
    err.status_code() == 403
}

pub fn is_not_found(err: &ServiceError) -> bool {
    err.status_code() == 404
}

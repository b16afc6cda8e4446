//! 도타 관리자 백엔드
//!
//! 챌린지 운영, 포상 지급, 공개 문서, 회원/권한 관리를 제공하는 REST API 서버입니다.
//! JWT 액세스 토큰과 회전(rotation)되는 리프레시 토큰으로 인증하며,
//! 서비스와 저장소는 `inventory` + `OnceCell` 싱글톤으로 주입됩니다.
//!
//! # Features
//!
//! - **회원 관리**: 로컬/카카오 가입, 알림 수신 설정, 탈퇴
//! - **역할/권한**: 역할(Role)과 세부 권한(Authority) 관리, ADMIN 전용 API
//! - **챌린지**: 참여/취소, 상태 전이(OPEN → IN_PROGRESS → COMPLETED), 포상 지급
//! - **포상/결제 이력**: 외부 시스템이 보내는 이력 수신 및 통계
//! - **문서**: 공개 문서 조회, 검색, 관리자 작성/발행
//! - **접속 상태**: 온라인 사용자 추적, WebSocket(`/ws`) 접속/해제 브로드캐스트
//! - **MongoDB**: 영구 저장, **Redis**: 조회 캐시
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   HTTP Routes   │ ← REST API 엔드포인트 + AuthMiddleware
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Handlers     │ ← 요청/응답 처리
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Services     │ ← 비즈니스 로직, 가입 이벤트 알림
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  Repositories   │ ← 데이터 액세스
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ MongoDB + Redis │ ← 저장소
//! └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use dota_admin_backend::services::challenges::ChallengeService;
//!
//! let challenge = ChallengeService::instance()
//!     .participate(&challenge_id, &user_id)
//!     .await?;
//! ```

pub mod caching;
pub mod config;
pub mod core;
pub mod db;
pub mod domain;
pub mod handlers;
pub mod middlewares;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod tools;
pub mod utils;

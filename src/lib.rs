/*
 * Responsibility
 * - crate の公開モジュール
 * - main.rs (binary) と tests/ から同じ経路で使う
 */
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;

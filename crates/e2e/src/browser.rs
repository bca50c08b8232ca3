//! Browser driver: login and navigation to a file's preview tab
//!
//! Every wait is a condition with a bound. The UI is an Ant Design SPA, so
//! readiness is detected from its layout and tab elements rather than from
//! elapsed time.

use crate::config::{Timeouts, UiConfig};
use crate::playwright::{Locator, PageStep};

const USERNAME_PLACEHOLDER: &str = "ユーザー名";
const PASSWORD_PLACEHOLDER: &str = "パスワード";
const LOGIN_BUTTON: &str = "ログイン";
const PREVIEW_TAB: &str = "プレビュー";

/// Steps that log into the UI and wait for the main layout
pub fn login_steps(ui: &UiConfig, timeouts: &Timeouts) -> Vec<PageStep> {
    vec![
        PageStep::Goto {
            url: ui.login_path.clone(),
        },
        PageStep::Fill {
            target: Locator::placeholder(USERNAME_PLACEHOLDER),
            value: ui.username.clone(),
        },
        PageStep::Fill {
            target: Locator::placeholder(PASSWORD_PLACEHOLDER),
            value: ui.password.clone(),
        },
        PageStep::Click {
            target: Locator::button(LOGIN_BUTTON),
            timeout_ms: timeouts.login_ms,
        },
        PageStep::ExpectHidden {
            target: Locator::placeholder(PASSWORD_PLACEHOLDER),
            timeout_ms: timeouts.login_ms,
        },
        PageStep::ExpectVisible {
            target: Locator::css(".ant-layout-sider").first(),
            timeout_ms: timeouts.login_ms,
        },
    ]
}

/// Row of the document listing whose text contains `file_name`
pub fn file_row(file_name: &str) -> Locator {
    Locator::css("tr").has_text(file_name).first()
}

/// The row's button carrying the eye icon
pub fn eye_button(file_name: &str) -> Locator {
    file_row(file_name)
        .child("button")
        .has("[data-icon=\"eye\"]")
        .first()
}

pub fn preview_tab() -> Locator {
    Locator::css(".ant-tabs-tab").has_text(PREVIEW_TAB).first()
}

/// Steps from a logged-in session to the active preview tab of `file_name`
pub fn open_preview_steps(ui: &UiConfig, timeouts: &Timeouts, folder_id: &str, file_name: &str) -> Vec<PageStep> {
    vec![
        PageStep::Goto {
            url: documents_url(ui, folder_id),
        },
        PageStep::WaitForNetworkIdle {
            timeout_ms: timeouts.settle_ms,
        },
        PageStep::ExpectVisible {
            target: file_row(file_name),
            timeout_ms: timeouts.row_visible_ms,
        },
        PageStep::Click {
            target: eye_button(file_name),
            timeout_ms: timeouts.row_visible_ms,
        },
        PageStep::ExpectVisible {
            target: preview_tab(),
            timeout_ms: timeouts.tab_visible_ms,
        },
        PageStep::Click {
            target: preview_tab(),
            timeout_ms: timeouts.tab_visible_ms,
        },
        PageStep::ExpectVisible {
            target: Locator::css(".ant-tabs-tabpane-active").first(),
            timeout_ms: timeouts.settle_ms,
        },
    ]
}

/// Hash route of the document listing for a folder
pub fn documents_url(ui: &UiConfig, folder_id: &str) -> String {
    format!("{}#/documents?folderId={}", ui.login_path, folder_id)
}

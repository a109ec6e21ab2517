#![cfg(target_arch = "wasm32")]

use wasm_bindgen::JsValue;
use web_sys::Document;

const STYLE_ELEMENT_ID: &str = "bloodnet-ui-styles";

/// Default CSS for the widgets along with easy-to-override design tokens.
pub const DEFAULT_STYLES: &str = r#"
:root {
  --bn-font-family: 'Inter', system-ui, -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
  --bn-accent: #dc2626;
  --bn-accent-strong: #b91c1c;
  --bn-accent-soft: #fee2e2;
  --bn-accent-soft-text: #b91c1c;
  --bn-surface: #ffffff;
  --bn-surface-muted: #f3f4f6;
  --bn-border: rgba(148, 163, 184, 0.32);
  --bn-text: #1f2933;
  --bn-muted: #6b7280;
  --bn-online: #047857;
  --bn-online-bg: rgba(16, 185, 129, 0.14);
  --bn-offline-bg: rgba(107, 114, 128, 0.14);
  --bn-radius: 16px;
  --bn-shadow: 0 24px 48px rgba(15, 23, 42, 0.18);
}

.bn-root {
  font-family: var(--bn-font-family);
  color: var(--bn-text);
}

.bn-fab {
  position: fixed;
  right: 16px;
  bottom: 16px;
  width: 56px;
  height: 56px;
  border: none;
  border-radius: 999px;
  background: var(--bn-accent);
  color: #ffffff;
  font-size: 1.4rem;
  cursor: pointer;
  box-shadow: var(--bn-shadow);
  transition: transform 200ms ease, background 200ms ease;
  z-index: 50;
}

.bn-fab:hover {
  background: var(--bn-accent-strong);
  transform: scale(1.1);
}

.bn-panel {
  background: var(--bn-surface);
  border-radius: var(--bn-radius);
  box-shadow: var(--bn-shadow);
  display: flex;
  flex-direction: column;
  overflow: hidden;
}

.bn-assistant-panel {
  position: fixed;
  right: 16px;
  bottom: 96px;
  width: 320px;
  height: 420px;
  z-index: 50;
}

.bn-panel-header {
  background: var(--bn-accent);
  color: #ffffff;
  padding: 14px 16px;
  display: flex;
  align-items: center;
  justify-content: space-between;
  font-weight: 600;
}

.bn-panel-header .bn-presence-dot {
  width: 10px;
  height: 10px;
  border-radius: 999px;
  background: #4ade80;
  margin-right: 8px;
  display: inline-block;
}

.bn-icon-button {
  background: transparent;
  border: none;
  color: inherit;
  font-size: 1.1rem;
  cursor: pointer;
}

.bn-transcript {
  flex: 1;
  overflow-y: auto;
  padding: 14px;
  display: flex;
  flex-direction: column;
  gap: 10px;
}

.bn-bubble {
  max-width: 80%;
  border-radius: var(--bn-radius);
  padding: 8px 14px;
  font-size: 0.88rem;
  white-space: pre-line;
}

.bn-bubble.is-outgoing {
  align-self: flex-end;
  background: var(--bn-accent);
  color: #ffffff;
}

.bn-bubble.is-incoming {
  align-self: flex-start;
  background: var(--bn-surface-muted);
  color: var(--bn-text);
}

.bn-bubble-meta {
  display: flex;
  justify-content: flex-end;
  gap: 4px;
  margin-top: 4px;
  font-size: 0.72rem;
  opacity: 0.7;
}

.bn-chips {
  display: flex;
  flex-wrap: wrap;
  gap: 8px;
  padding: 8px 14px;
  border-top: 1px solid var(--bn-border);
}

.bn-chip {
  border: none;
  border-radius: 999px;
  padding: 4px 12px;
  font-size: 0.75rem;
  background: var(--bn-accent-soft);
  color: var(--bn-accent-soft-text);
  cursor: pointer;
}

.bn-chip.is-active {
  background: var(--bn-accent);
  color: #ffffff;
}

.bn-composer {
  display: flex;
  gap: 8px;
  padding: 12px 14px;
  border-top: 1px solid var(--bn-border);
}

.bn-composer input {
  flex: 1;
  border: 1px solid var(--bn-border);
  border-radius: 10px;
  padding: 8px 12px;
  font-size: 0.88rem;
}

.bn-composer input:focus {
  outline: 2px solid var(--bn-accent);
  outline-offset: 1px;
}

.bn-send {
  border: none;
  border-radius: 10px;
  background: var(--bn-accent);
  color: #ffffff;
  padding: 8px 14px;
  cursor: pointer;
}

.bn-stock-grid {
  display: grid;
  grid-template-columns: repeat(auto-fill, minmax(120px, 1fr));
  gap: 14px;
}

.bn-stock-card {
  border: 1px solid var(--bn-border);
  border-radius: 12px;
  background: var(--bn-surface);
  padding: 16px;
  text-align: center;
  cursor: pointer;
  display: flex;
  flex-direction: column;
  gap: 4px;
}

.bn-stock-card.is-urgent {
  border-color: var(--bn-accent);
  animation: bn-pulse 2s ease-in-out infinite;
}

.bn-stock-type {
  font-size: 1.5rem;
  font-weight: 700;
  color: var(--bn-accent);
}

.bn-stock-count {
  font-size: 1.1rem;
  font-weight: 600;
  font-variant-numeric: tabular-nums;
}

.bn-stock-card.is-urgent .bn-stock-count {
  color: var(--bn-accent-strong);
}

.bn-stock-unit {
  font-size: 0.8rem;
  color: var(--bn-muted);
}

.bn-stock-flag {
  font-size: 0.72rem;
  font-weight: 700;
  color: var(--bn-accent);
  letter-spacing: 0.08em;
}

.bn-overlay {
  position: fixed;
  inset: 0;
  background: rgba(0, 0, 0, 0.5);
  display: flex;
  align-items: center;
  justify-content: center;
  z-index: 60;
}

.bn-detail {
  background: var(--bn-surface);
  border-radius: var(--bn-radius);
  padding: 32px;
  max-width: 360px;
  margin: 0 16px;
  text-align: center;
}

.bn-detail-type {
  font-size: 2.2rem;
  font-weight: 700;
  color: var(--bn-accent);
}

.bn-detail-headline {
  font-size: 1.4rem;
  font-weight: 600;
  margin: 8px 0;
}

.bn-detail-note {
  color: var(--bn-muted);
  margin-bottom: 20px;
}

.bn-chat-panel {
  width: 100%;
  max-width: 420px;
  height: 420px;
  margin: 0 16px;
}

.bn-typing {
  padding: 6px 14px;
  font-size: 0.82rem;
  color: var(--bn-muted);
}

.bn-typing span {
  animation: bn-blink 1.2s infinite;
}

.bn-privacy {
  text-align: center;
  font-size: 0.72rem;
  color: var(--bn-muted);
  padding: 0 14px 10px;
}

.bn-directory-toolbar {
  display: flex;
  flex-direction: column;
  gap: 10px;
  margin-bottom: 14px;
}

.bn-directory-toolbar input {
  border: 1px solid var(--bn-border);
  border-radius: 10px;
  padding: 8px 12px;
}

.bn-donor-list {
  list-style: none;
  margin: 0;
  padding: 0;
  display: grid;
  gap: 10px;
}

.bn-donor-card {
  border: 1px solid var(--bn-border);
  border-radius: 12px;
  padding: 12px 14px;
  display: flex;
  align-items: center;
  justify-content: space-between;
  gap: 10px;
  animation: bn-slide-in 0.3s ease-out;
}

.bn-donor-name {
  font-weight: 600;
}

.bn-donor-meta {
  font-size: 0.8rem;
  color: var(--bn-muted);
}

.bn-status {
  border-radius: 999px;
  padding: 2px 8px;
  font-size: 0.72rem;
  font-weight: 600;
  background: var(--bn-offline-bg);
  color: var(--bn-muted);
}

.bn-status.is-online {
  background: var(--bn-online-bg);
  color: var(--bn-online);
}

.bn-empty {
  color: var(--bn-muted);
  font-size: 0.88rem;
}

@keyframes bn-pulse {
  0%, 100% { box-shadow: 0 0 0 0 rgba(220, 38, 38, 0.35); }
  50% { box-shadow: 0 0 0 8px rgba(220, 38, 38, 0); }
}

@keyframes bn-blink {
  0%, 100% { opacity: 0.2; }
  50% { opacity: 1; }
}

@keyframes bn-slide-in {
  from { opacity: 0; transform: translateY(6px); }
  to { opacity: 1; transform: translateY(0); }
}

@media (max-width: 480px) {
  .bn-assistant-panel {
    right: 8px;
    left: 8px;
    width: auto;
  }

  .bn-stock-grid {
    grid-template-columns: repeat(2, 1fr);
  }
}
"#;

/// Gắn stylesheet mặc định một lần cho mỗi document.
///
/// Thẻ đã có nhưng nội dung cũ (bản build trước) thì được ghi đè. Trả về `true`
/// khi thẻ `<style>` vừa được tạo.
pub fn ensure_styles(document: &Document) -> Result<bool, JsValue> {
    if let Some(existing) = document.get_element_by_id(STYLE_ELEMENT_ID) {
        if existing.text_content().as_deref() != Some(DEFAULT_STYLES) {
            existing.set_text_content(Some(DEFAULT_STYLES));
        }
        return Ok(false);
    }

    let target = match document.query_selector("head")? {
        Some(head) => head,
        None => document
            .document_element()
            .ok_or_else(|| JsValue::from_str("Document rỗng, không gắn được CSS"))?,
    };

    let style = document.create_element("style")?;
    style.set_id(STYLE_ELEMENT_ID);
    style.set_text_content(Some(DEFAULT_STYLES));
    target.append_child(&style)?;
    Ok(true)
}

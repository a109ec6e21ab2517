//! Thành phần giao diện BloodNet cho môi trường WebAssembly: trợ lý nổi,
//! bảng tồn kho, khung chat ẩn danh và danh bạ người hiến.

pub mod mount;
pub mod view_model;

#[cfg(target_arch = "wasm32")]
mod driver;
#[cfg(target_arch = "wasm32")]
mod styles;

#[cfg(target_arch = "wasm32")]
mod wasm_ui {
    use std::sync::Once;

    use crate::driver::Driver;
    use crate::mount::{MountOptions, WidgetSet};
    use crate::styles;
    use crate::view_model::{self, BubbleView, DonorCardView, StockCardView};
    use bloodnet_core::{
        Assistant, AssistantAction, BloodNetError, BloodType, ChatAction, ChatPanel, Dashboard,
        DashboardAction, DirectoryAction, DonorDirectory, StockDetail, Widget, WidgetId,
    };
    use chrono::Utc;
    use serde_wasm_bindgen::from_value;
    use wasm_bindgen::prelude::*;
    use web_sys::{console, Document, Element, HtmlInputElement, Window};
    use yew::events::{InputEvent, KeyboardEvent};
    use yew::html::BaseComponent;
    use yew::prelude::*;
    use yew::TargetCast;

    static TRACING: Once = Once::new();

    /// Gắn hàm vẽ lại của component vào driver trong suốt vòng đời component.
    #[hook]
    fn use_driver_redraw<W>(driver: &Driver<W>)
    where
        W: Widget + 'static,
        W::Action: 'static,
    {
        let redraw = use_force_update();
        use_effect_with(driver.clone(), move |driver| {
            let driver = driver.clone();
            driver.subscribe(move || redraw.force_update());
            move || driver.unsubscribe()
        });
    }

    #[hook]
    fn use_focus_when(open: bool, input_ref: NodeRef) {
        use_effect_with(open, move |open| {
            if *open {
                if let Some(input) = input_ref.cast::<HtmlInputElement>() {
                    if let Err(err) = input.focus() {
                        console::error_1(&err);
                    }
                }
            }
            || ()
        });
    }

    #[hook]
    fn use_scroll_to_bottom(message_count: usize, list_ref: NodeRef) {
        use_effect_with(message_count, move |_| {
            if let Some(list) = list_ref.cast::<Element>() {
                list.set_scroll_top(list.scroll_height());
            }
            || ()
        });
    }

    #[derive(Properties, PartialEq)]
    pub struct AssistantProps {
        pub driver: Driver<Assistant>,
    }

    #[function_component(AssistantWidget)]
    fn assistant_widget(props: &AssistantProps) -> Html {
        let driver = props.driver.clone();
        use_driver_redraw(&driver);

        let now = Utc::now();
        let (open, input, bubbles, chips) = driver.with(|assistant| {
            (
                assistant.visibility().is_open(),
                assistant.input().to_string(),
                view_model::assistant_bubbles(assistant, now),
                view_model::assistant_chips(assistant),
            )
        });

        let input_ref = use_node_ref();
        let transcript_ref = use_node_ref();
        use_focus_when(open, input_ref.clone());
        use_scroll_to_bottom(bubbles.len(), transcript_ref.clone());

        let on_toggle = {
            let driver = driver.clone();
            Callback::from(move |_| driver.dispatch(AssistantAction::Toggle))
        };
        let on_input = {
            let driver = driver.clone();
            Callback::from(move |event: InputEvent| {
                let input: HtmlInputElement = event.target_unchecked_into();
                driver.dispatch(AssistantAction::Input(input.value()));
            })
        };
        let on_keydown = {
            let driver = driver.clone();
            Callback::from(move |event: KeyboardEvent| {
                if event.key() == "Enter" {
                    driver.dispatch(AssistantAction::Submit);
                }
            })
        };
        let on_send = {
            let driver = driver.clone();
            Callback::from(move |_| driver.dispatch(AssistantAction::Submit))
        };

        html! {
            <div class="bn-root bn-assistant">
                <button type="button" class="bn-fab" onclick={on_toggle.clone()} aria-label="Open AI assistant">{"💬"}</button>
                if open {
                    <section class="bn-panel bn-assistant-panel" aria-label="BloodNet AI Assistant">
                        <header class="bn-panel-header">
                            <span><span class="bn-presence-dot"></span>{"BloodNet AI Assistant"}</span>
                            <button type="button" class="bn-icon-button" onclick={on_toggle} aria-label="Close">{"✕"}</button>
                        </header>
                        <div class="bn-transcript" ref={transcript_ref} aria-live="polite">
                            { for bubbles.iter().map(render_bubble) }
                        </div>
                        <div class="bn-chips">
                            {
                                for chips.into_iter().map(|chip| {
                                    let driver = driver.clone();
                                    let query = chip.query.clone();
                                    let onclick = Callback::from(move |_| driver.dispatch(AssistantAction::Ask(query.clone())));
                                    html! { <button type="button" class="bn-chip" {onclick}>{ chip.label }</button> }
                                })
                            }
                        </div>
                        <div class="bn-composer">
                            <input
                                ref={input_ref}
                                type="text"
                                placeholder="Ask me anything..."
                                value={input}
                                oninput={on_input}
                                onkeydown={on_keydown}
                                aria-label="Ask the assistant"
                            />
                            <button type="button" class="bn-send" onclick={on_send}>{"Send"}</button>
                        </div>
                    </section>
                }
            </div>
        }
    }

    #[derive(Properties, PartialEq)]
    pub struct InventoryProps {
        pub driver: Driver<Dashboard>,
    }

    #[function_component(InventoryWidget)]
    fn inventory_widget(props: &InventoryProps) -> Html {
        let driver = props.driver.clone();
        use_driver_redraw(&driver);

        let (open, cards, detail) = driver.with(|dashboard| {
            (
                dashboard.visibility().is_open(),
                view_model::stock_cards(dashboard.inventory()),
                dashboard.detail().cloned(),
            )
        });

        let on_close = {
            let driver = driver.clone();
            Callback::from(move |_| driver.dispatch(DashboardAction::CloseDetail))
        };

        html! {
            <section class="bn-root bn-inventory" hidden={!open} aria-live="polite">
                <div class="bn-stock-grid">
                    {
                        for cards.iter().map(|card| {
                            let driver = driver.clone();
                            let blood_type = card.blood_type;
                            let onclick = Callback::from(move |_| driver.dispatch(DashboardAction::Select(blood_type)));
                            render_stock_card(card, onclick)
                        })
                    }
                </div>
                { detail.map(|detail| render_stock_detail(&detail, on_close)).unwrap_or_default() }
            </section>
        }
    }

    fn render_stock_card(card: &StockCardView, onclick: Callback<MouseEvent>) -> Html {
        html! {
            <button type="button" class={card.class()} data-blood-type={card.label} {onclick}>
                <span class="bn-stock-type">{ card.label }</span>
                <span class="bn-stock-count">{ card.count }</span>
                <span class="bn-stock-unit">{"units"}</span>
                if card.urgent {
                    <span class="bn-stock-flag">{"URGENT"}</span>
                }
            </button>
        }
    }

    fn render_stock_detail(detail: &StockDetail, on_close: Callback<MouseEvent>) -> Html {
        html! {
            <div class="bn-overlay" role="dialog" aria-modal="true">
                <div class="bn-detail">
                    <div class="bn-detail-type">{ detail.blood_type.label() }</div>
                    <div class="bn-detail-headline">{ detail.headline.clone() }</div>
                    <p class="bn-detail-note">{ detail.note }</p>
                    <button type="button" class="bn-send" onclick={on_close}>{"Close"}</button>
                </div>
            </div>
        }
    }

    #[derive(Properties, PartialEq)]
    pub struct ChatProps {
        pub driver: Driver<ChatPanel>,
    }

    #[function_component(ChatWidget)]
    fn chat_widget(props: &ChatProps) -> Html {
        let driver = props.driver.clone();
        use_driver_redraw(&driver);

        let now = Utc::now();
        let (open, input, typing, bubbles) = driver.with(|panel| {
            (
                panel.visibility().is_open(),
                panel.input().to_string(),
                panel.is_typing(),
                view_model::chat_bubbles(panel, now),
            )
        });

        let input_ref = use_node_ref();
        let messages_ref = use_node_ref();
        use_focus_when(open, input_ref.clone());
        use_scroll_to_bottom(bubbles.len(), messages_ref.clone());

        if !open {
            return Html::default();
        }

        let on_close = {
            let driver = driver.clone();
            Callback::from(move |_| driver.dispatch(ChatAction::Close))
        };
        let on_input = {
            let driver = driver.clone();
            Callback::from(move |event: InputEvent| {
                let input: HtmlInputElement = event.target_unchecked_into();
                driver.dispatch(ChatAction::Input(input.value()));
            })
        };
        let on_keydown = {
            let driver = driver.clone();
            Callback::from(move |event: KeyboardEvent| {
                if event.key() == "Enter" {
                    driver.dispatch(ChatAction::Send);
                }
            })
        };
        let on_send = {
            let driver = driver.clone();
            Callback::from(move |_| driver.dispatch(ChatAction::Send))
        };

        html! {
            <div class="bn-root bn-overlay" role="dialog" aria-modal="true">
                <section class="bn-panel bn-chat-panel">
                    <header class="bn-panel-header">
                        <span><span class="bn-presence-dot"></span>{"Anonymous Chat"}</span>
                        <button type="button" class="bn-icon-button" onclick={on_close} aria-label="Close">{"✕"}</button>
                    </header>
                    <div class="bn-transcript" ref={messages_ref} aria-live="polite">
                        { for bubbles.iter().map(render_bubble) }
                    </div>
                    if typing {
                        <div class="bn-typing">{"Donor is typing"}<span>{"..."}</span></div>
                    }
                    <div class="bn-composer">
                        <input
                            ref={input_ref}
                            type="text"
                            placeholder="Type your message..."
                            value={input}
                            oninput={on_input}
                            onkeydown={on_keydown}
                            aria-label="Message the donor"
                        />
                        <button type="button" class="bn-send" onclick={on_send}>{"Send"}</button>
                    </div>
                    <p class="bn-privacy">{"🔒 Privacy-first & secure • Personal info shared only after mutual consent"}</p>
                </section>
            </div>
        }
    }

    fn render_bubble(bubble: &BubbleView) -> Html {
        html! {
            <div key={bubble.key} class={bubble.side.class()}>
                <div>{ bubble.text.clone() }</div>
                <div class="bn-bubble-meta">
                    <span>{ bubble.meta.clone() }</span>
                    if bubble.delivered {
                        <span aria-label="Delivered">{"✓✓"}</span>
                    }
                </div>
            </div>
        }
    }

    #[derive(Properties, PartialEq)]
    pub struct DonorsProps {
        pub driver: Driver<DonorDirectory>,
        pub on_chat: Callback<String>,
    }

    #[function_component(DonorsWidget)]
    fn donors_widget(props: &DonorsProps) -> Html {
        let driver = props.driver.clone();
        use_driver_redraw(&driver);

        let (open, draft, filter, cards) = driver.with(|directory| {
            (
                directory.visibility().is_open(),
                directory.draft_query().to_string(),
                directory.filter(),
                view_model::donor_cards(directory),
            )
        });

        let on_search = {
            let driver = driver.clone();
            Callback::from(move |event: InputEvent| {
                let input: HtmlInputElement = event.target_unchecked_into();
                driver.dispatch(DirectoryAction::Search(input.value()));
            })
        };

        html! {
            <section class="bn-root bn-directory" hidden={!open}>
                <div class="bn-directory-toolbar">
                    <input
                        type="search"
                        placeholder="Search donors by name or location"
                        value={draft}
                        oninput={on_search}
                        aria-label="Search donors"
                    />
                    <div class="bn-chips" role="group" aria-label="Filter by blood type">
                        {
                            for view_model::filter_chips(filter).into_iter().map(|(label, option, active)| {
                                let driver = driver.clone();
                                let onclick = Callback::from(move |_| driver.dispatch(DirectoryAction::Filter(option)));
                                html! {
                                    <button type="button" class={classes!("bn-chip", active.then_some("is-active"))} {onclick}>
                                        { label }
                                    </button>
                                }
                            })
                        }
                    </div>
                </div>
                <ul class="bn-donor-list">
                    {
                        if cards.is_empty() {
                            html! { <li class="bn-empty">{"No donors match your search."}</li> }
                        } else {
                            html! { for cards.iter().map(|card| render_donor_card(card, props.on_chat.clone())) }
                        }
                    }
                </ul>
            </section>
        }
    }

    fn render_donor_card(card: &DonorCardView, on_chat: Callback<String>) -> Html {
        let donor_id = card.id.clone();
        let onclick = Callback::from(move |_| on_chat.emit(donor_id.clone()));

        html! {
            <li key={card.id.clone()} class="bn-donor-card">
                <div>
                    <div class="bn-donor-name">{ card.name.clone() }</div>
                    <div class="bn-donor-meta">{ format!("{} • {}", card.blood_type, card.location) }</div>
                </div>
                <span class={classes!("bn-status", card.online.then_some("is-online"))}>{ card.status }</span>
                <button type="button" class="bn-send" {onclick}>{"Chat"}</button>
            </li>
        }
    }

    struct MountedApp {
        host: Element,
        destroy: Box<dyn FnOnce()>,
    }

    /// Handle trả về cho trang host sau khi mount.
    #[wasm_bindgen]
    pub struct BloodNetWidgets {
        assistant: Driver<Assistant>,
        dashboard: Driver<Dashboard>,
        chat: Driver<ChatPanel>,
        directory: Driver<DonorDirectory>,
        mounted: Vec<MountedApp>,
    }

    #[wasm_bindgen]
    impl BloodNetWidgets {
        pub fn toggle_widget(&self, widget_id: &str) -> Result<(), JsValue> {
            let widget: WidgetId = widget_id
                .parse()
                .map_err(|err: BloodNetError| JsValue::from_str(&err.to_string()))?;
            match widget {
                WidgetId::Assistant => self.assistant.dispatch(AssistantAction::Toggle),
                WidgetId::Inventory => self.dashboard.dispatch(DashboardAction::Toggle),
                WidgetId::Chat => self.chat.dispatch(ChatAction::Toggle),
                WidgetId::Donors => self.directory.dispatch(DirectoryAction::Toggle),
            }
            Ok(())
        }

        /// Câu hỏi rỗng bị bỏ qua, không báo lỗi.
        pub fn submit_query(&self, text: &str) {
            self.assistant.dispatch(AssistantAction::Ask(text.to_string()));
        }

        pub fn select_category(&self, blood_type: &str) -> Result<(), JsValue> {
            let blood_type: BloodType = blood_type
                .parse()
                .map_err(|err: BloodNetError| JsValue::from_str(&err.to_string()))?;
            self.dashboard.dispatch(DashboardAction::Select(blood_type));
            Ok(())
        }

        pub fn open_chat(&self, donor_id: Option<String>) {
            self.chat.dispatch(ChatAction::Open { donor_id });
        }

        pub fn set_page_context(&self, path: &str) {
            self.assistant.dispatch(AssistantAction::PageContext {
                path: path.to_string(),
            });
        }

        /// Áp dụng sự kiện tồn kho từ feed: mảng hoặc `{"events": [...]}`.
        pub fn apply_stock_events(&self, events: JsValue) -> Result<(), JsValue> {
            let value = from_value::<serde_json::Value>(events)
                .map_err(|err| JsValue::from_str(&format!("Không đọc được sự kiện: {err}")))?;
            let changes = bloodnet_feed::parse_stock_events_value(&value)
                .map_err(|err| JsValue::from_str(&err.to_string()))?;
            for change in changes {
                self.dashboard.dispatch(DashboardAction::StockChanged(change));
            }
            Ok(())
        }

        /// Huỷ mọi hẹn giờ và gỡ các widget khỏi DOM.
        pub fn unmount(&mut self) {
            self.assistant.cancel_all();
            self.dashboard.cancel_all();
            self.chat.cancel_all();
            self.directory.cancel_all();

            for app in self.mounted.drain(..) {
                (app.destroy)();
                app.host.remove();
            }
            tracing::info!("bloodnet-ui: đã gỡ widget");
        }
    }

    fn mount_into<C>(document: &Document, selector: &str, props: C::Properties) -> Option<MountedApp>
    where
        C: BaseComponent,
    {
        let container = match document.query_selector(selector) {
            Ok(Some(container)) => container,
            Ok(None) | Err(_) => {
                let err = BloodNetError::ContainerMissing(selector.to_string());
                tracing::warn!(%err, "bloodnet-ui: bỏ qua widget");
                return None;
            }
        };

        let host = match create_host(document, &container) {
            Ok(host) => host,
            Err(err) => {
                console::error_1(&err);
                return None;
            }
        };

        let handle = yew::Renderer::<C>::with_root_and_props(host.clone(), props).render();
        Some(MountedApp {
            host,
            destroy: Box::new(move || handle.destroy()),
        })
    }

    // Yew xoá nội dung của root nên mỗi widget có một phần tử riêng.
    fn create_host(document: &Document, container: &Element) -> Result<Element, JsValue> {
        let host = document.create_element("div")?;
        host.set_attribute("data-bloodnet-widget", "")?;
        container.append_child(&host)?;
        Ok(host)
    }

    fn read_options(options: Option<JsValue>) -> MountOptions {
        match options {
            Some(value) if !value.is_undefined() && !value.is_null() => {
                from_value(value).unwrap_or_else(|err| {
                    tracing::warn!(%err, "bloodnet-ui: tuỳ chọn mount không hợp lệ, dùng mặc định");
                    MountOptions::default()
                })
            }
            _ => MountOptions::default(),
        }
    }

    #[wasm_bindgen]
    pub fn mount_bloodnet_widgets(options: Option<JsValue>) -> Result<BloodNetWidgets, JsValue> {
        console_error_panic_hook::set_once();
        TRACING.call_once(tracing_wasm::set_as_global_default);

        let window: Window =
            web_sys::window().ok_or_else(|| JsValue::from_str("Không có window"))?;
        let document: Document = window
            .document()
            .ok_or_else(|| JsValue::from_str("Không truy cập được document"))?;
        if styles::ensure_styles(&document)? {
            tracing::debug!("bloodnet-ui: đã gắn stylesheet mặc định");
        }

        let options = read_options(options);
        let widgets = WidgetSet::from_options(&options, Utc::now());

        let assistant = Driver::new(widgets.assistant);
        let dashboard = Driver::new(widgets.dashboard);
        let chat = Driver::new(widgets.chat);
        let directory = Driver::new(widgets.directory);

        dashboard.dispatch(DashboardAction::Start);
        directory.dispatch(DirectoryAction::Start);

        let on_chat = {
            let chat = chat.clone();
            Callback::from(move |donor_id: String| {
                chat.dispatch(ChatAction::Open {
                    donor_id: Some(donor_id),
                })
            })
        };

        let mounted = [
            mount_into::<AssistantWidget>(
                &document,
                options.selector(WidgetId::Assistant),
                AssistantProps {
                    driver: assistant.clone(),
                },
            ),
            mount_into::<InventoryWidget>(
                &document,
                options.selector(WidgetId::Inventory),
                InventoryProps {
                    driver: dashboard.clone(),
                },
            ),
            mount_into::<ChatWidget>(
                &document,
                options.selector(WidgetId::Chat),
                ChatProps {
                    driver: chat.clone(),
                },
            ),
            mount_into::<DonorsWidget>(
                &document,
                options.selector(WidgetId::Donors),
                DonorsProps {
                    driver: directory.clone(),
                    on_chat,
                },
            ),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>();

        tracing::info!(mounted = mounted.len(), "bloodnet-ui: đã mount widget");

        Ok(BloodNetWidgets {
            assistant,
            dashboard,
            chat,
            directory,
            mounted,
        })
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm_ui::{mount_bloodnet_widgets, BloodNetWidgets};

#[cfg(not(target_arch = "wasm32"))]
pub fn mount_bloodnet_widgets(
    _: Option<wasm_bindgen::JsValue>,
) -> Result<(), wasm_bindgen::JsValue> {
    Err(wasm_bindgen::JsValue::from_str(
        "bloodnet-ui chỉ hỗ trợ biên dịch target wasm32",
    ))
}

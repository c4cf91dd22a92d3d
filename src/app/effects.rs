use std::path::PathBuf;
use std::sync::Arc;

use crate::app::{App, Message, Model};
use crate::document::DocumentHandle;

impl App {
    /// Issue the collaborator calls a message asks for.
    ///
    /// Runs after [`update`](crate::app::update); the model already reflects
    /// the message. Any pending page renders are dispatched on every call.
    pub(super) fn handle_message_side_effects(&self, model: &mut Model, msg: &Message) {
        match msg {
            Message::OpenDocument(_) => self.spawn_document_tasks(model),
            Message::SubmitSearch => self.spawn_ask(model),
            Message::SubmitUpload => self.submit_upload(model),
            _ => {}
        }
        self.dispatch_render_requests(model);
    }

    fn spawn_document_tasks(&self, model: &Model) {
        let Some(renderer) = model.session.renderer.as_ref() else {
            return;
        };
        let session = model.session.id;
        let handle = renderer.handle().clone();

        let rasterizer = Arc::clone(&self.services.rasterizer);
        let open_handle = handle.clone();
        self.tasks.spawn("open", move |tx| {
            let _scope = crate::perf::scope("task.open_document");
            let result = rasterizer
                .open_document(&open_handle)
                .map(|info| info.page_count)
                .map_err(|err| err.to_string());
            tx.send(Message::DocumentOpened { session, result });
        });

        if model.needs_page_text() {
            let rasterizer = Arc::clone(&self.services.rasterizer);
            self.tasks.spawn("page-text", move |tx| {
                let result = rasterizer.page_text(&handle).map_err(|err| err.to_string());
                tx.send(Message::PageTextLoaded { session, result });
            });
        }

        if let Some(service) = self.services.suggestions.as_ref() {
            let service = Arc::clone(service);
            self.tasks.spawn("suggestions", move |tx| {
                let result = service.suggestions().map_err(|err| err.to_string());
                tx.send(Message::SuggestionsLoaded { session, result });
            });
        }
    }

    fn spawn_ask(&self, model: &mut Model) {
        let Some((question, seq)) = model.session.pending_ask.take() else {
            return;
        };
        let session = model.session.id;
        let Some(service) = self.services.answers.as_ref() else {
            tracing::warn!(%session, seq, "no answering service configured");
            model.session.search.answer_loaded(seq, Err("no answering service".to_string()));
            model.session.relayout_answer();
            return;
        };
        let service = Arc::clone(service);
        self.tasks.spawn("ask", move |tx| {
            let result = service
                .ask(&question)
                .map(|answer| answer.answer_markup)
                .map_err(|err| err.to_string());
            tx.send(Message::AnswerLoaded {
                session,
                seq,
                result,
            });
        });
    }

    fn submit_upload(&self, model: &mut Model) {
        let Some(prompt) = model.upload_prompt.as_mut() else {
            return;
        };
        let path = PathBuf::from(prompt.input.trim());
        match self.services.upload.upload(&path) {
            Ok(upload) => {
                crate::perf::log_event(
                    "upload.ok",
                    format!("name={} url={}", upload.name, upload.url),
                );
                model.upload_prompt = None;
                self.tasks
                    .post(Message::OpenDocument(DocumentHandle::Url(upload.url)));
            }
            Err(err) => {
                tracing::info!(path = %path.display(), %err, "upload rejected");
                prompt.error = Some(err.to_string());
            }
        }
    }

    /// Render every page at the current width, streaming pages back one at a
    /// time so they appear as they finish.
    fn dispatch_render_requests(&self, model: &mut Model) {
        let session = model.session.id;
        let Some(renderer) = model.session.renderer.as_mut() else {
            return;
        };
        let Some(requests) = renderer.take_pending_requests() else {
            return;
        };
        let handle = renderer.handle().clone();
        tracing::debug!(
            %session,
            pages = requests.len(),
            width = ?renderer.render_width(),
            "dispatching page renders"
        );
        let rasterizer = Arc::clone(&self.services.rasterizer);
        self.tasks.spawn("render", move |tx| {
            for request in requests {
                let msg = match rasterizer.render_page(&handle, request.index, request.width) {
                    Ok(page) => Message::PageRendered { session, page },
                    Err(err) => Message::PageRenderFailed {
                        session,
                        index: request.index,
                        width: request.width,
                        error: err.to_string(),
                    },
                };
                if !tx.send(msg) {
                    break;
                }
            }
        });
    }
}

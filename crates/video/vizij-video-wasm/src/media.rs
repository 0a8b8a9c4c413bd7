use std::cell::RefCell;
use std::rc::Rc;

use vizij_video_core::{LoadTicket, MediaError, MediaEvent, MediaResource, SourceDescriptor};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlSourceElement, HtmlVideoElement};

type Inbox = Rc<RefCell<Vec<MediaEvent>>>;

fn backend(context: &str, err: JsValue) -> MediaError {
    MediaError::backend(format!("{context}: {err:?}"))
}

/// Media resource backed by a hidden `<video>` element appended to the page.
///
/// Element callbacks only push into a shared inbox; the owning player drains
/// it from `update`, so no callback ever touches player state directly.
pub struct HtmlVideoMedia {
    document: Document,
    video: HtmlVideoElement,
    inbox: Inbox,
    sources: Vec<HtmlSourceElement>,
    listeners: Vec<Closure<dyn FnMut()>>,
    /// `canplay` and `error` handlers of the current load, stamped with its ticket.
    load_listeners: Vec<Closure<dyn FnMut()>>,
}

impl HtmlVideoMedia {
    pub fn new() -> Result<Self, MediaError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| MediaError::backend("no document available"))?;
        let video: HtmlVideoElement = document
            .create_element("video")
            .map_err(|e| backend("failed to create video element", e))?
            .dyn_into()
            .map_err(|_| MediaError::backend("element is not a video"))?;

        video.set_preload("auto");
        // iOS needs both spellings to keep playback inline.
        video
            .set_attribute("playsinline", "")
            .map_err(|e| backend("playsinline", e))?;
        video
            .set_attribute("webkit-playsinline", "")
            .map_err(|e| backend("webkit-playsinline", e))?;
        video
            .style()
            .set_property("display", "none")
            .map_err(|e| backend("style", e))?;

        document
            .body()
            .ok_or_else(|| MediaError::backend("no document body"))?
            .append_child(&video)
            .map_err(|e| backend("failed to append video", e))?;

        let mut media = Self {
            document,
            video,
            inbox: Rc::default(),
            sources: Vec::new(),
            listeners: Vec::new(),
            load_listeners: Vec::new(),
        };
        media.install_listeners();
        Ok(media)
    }

    /// The element frames are decoded into; hosts build their texture from it.
    pub fn element(&self) -> &HtmlVideoElement {
        &self.video
    }

    fn signal(&self, event: MediaEvent) -> Closure<dyn FnMut()> {
        let inbox = self.inbox.clone();
        Closure::new(move || inbox.borrow_mut().push(event.clone()))
    }

    fn install_listeners(&mut self) {
        let on_play = self.signal(MediaEvent::Playing);
        let on_pause = self.signal(MediaEvent::Paused);
        let on_ended = self.signal(MediaEvent::Ended);

        self.video.set_onplay(Some(on_play.as_ref().unchecked_ref()));
        self.video.set_onpause(Some(on_pause.as_ref().unchecked_ref()));
        self.video.set_onended(Some(on_ended.as_ref().unchecked_ref()));
        self.listeners = vec![on_play, on_pause, on_ended];
    }

    /// A failing `<source>` raises `error` on itself, not on the video, so the
    /// handler goes on every attached source as well as the element.
    fn install_error_listener(&self, ticket: LoadTicket) -> Closure<dyn FnMut()> {
        let inbox = self.inbox.clone();
        let video = self.video.clone();
        let attempted: Vec<String> = self.sources.iter().map(|s| s.src()).collect();
        let on_error: Closure<dyn FnMut()> = Closure::new(move || {
            let src = video.current_src();
            let message = if src.is_empty() {
                format!("failed to load '{}'", attempted.join("', '"))
            } else {
                format!("failed to load '{src}'")
            };
            inbox.borrow_mut().push(MediaEvent::Error {
                ticket: Some(ticket),
                message,
            });
        });
        let handler = Some(on_error.as_ref().unchecked_ref());
        self.video.set_onerror(handler);
        for source in &self.sources {
            source.set_onerror(handler);
        }
        on_error
    }
}

impl MediaResource for HtmlVideoMedia {
    fn clear_sources(&mut self) -> Result<(), MediaError> {
        for source in self.sources.drain(..) {
            source.set_onerror(None);
        }
        while let Some(child) = self.video.first_child() {
            self.video
                .remove_child(&child)
                .map_err(|e| backend("failed to remove source", e))?;
        }
        self.video
            .remove_attribute("src")
            .map_err(|e| backend("failed to clear src", e))?;
        Ok(())
    }

    fn attach_source(&mut self, source: &SourceDescriptor) -> Result<(), MediaError> {
        let element: HtmlSourceElement = self
            .document
            .create_element("source")
            .map_err(|e| backend("failed to create source element", e))?
            .dyn_into()
            .map_err(|_| MediaError::backend("element is not a source"))?;
        element.set_src(&source.uri);
        element.set_type(&source.mime);
        self.video
            .append_child(&element)
            .map_err(|e| backend("failed to attach source", e))?;
        self.sources.push(element);
        Ok(())
    }

    fn load(&mut self, ticket: LoadTicket) -> Result<(), MediaError> {
        let inbox = self.inbox.clone();
        let on_can_play: Closure<dyn FnMut()> =
            Closure::new(move || inbox.borrow_mut().push(MediaEvent::CanPlay { ticket }));
        self.video
            .set_oncanplay(Some(on_can_play.as_ref().unchecked_ref()));
        let on_error = self.install_error_listener(ticket);
        self.load_listeners = vec![on_can_play, on_error];
        self.video.load();
        Ok(())
    }

    fn play(&mut self) -> Result<(), MediaError> {
        // The returned promise is dropped; outcomes arrive as play/pause/error events.
        self.video
            .play()
            .map(|_| ())
            .map_err(|e| backend("play failed", e))
    }

    fn pause(&mut self) -> Result<(), MediaError> {
        self.video.pause().map_err(|e| backend("pause failed", e))
    }

    fn is_paused(&self) -> bool {
        self.video.paused()
    }

    fn video_dimensions(&self) -> Option<(u32, u32)> {
        let (w, h) = (self.video.video_width(), self.video.video_height());
        (w > 0 && h > 0).then_some((w, h))
    }

    fn volume(&self) -> f32 {
        self.video.volume() as f32
    }

    fn set_volume(&mut self, volume: f32) {
        self.video.set_volume(volume as f64);
    }

    fn is_muted(&self) -> bool {
        self.video.muted()
    }

    fn set_muted(&mut self, muted: bool) {
        self.video.set_muted(muted);
    }

    fn is_autoplay(&self) -> bool {
        self.video.autoplay()
    }

    fn set_autoplay(&mut self, autoplay: bool) {
        self.video.set_autoplay(autoplay);
    }

    fn is_loop(&self) -> bool {
        self.video.loop_()
    }

    fn set_loop(&mut self, looping: bool) {
        self.video.set_loop(looping);
    }

    fn drain_events(&mut self, out: &mut Vec<MediaEvent>) {
        out.append(&mut self.inbox.borrow_mut());
    }
}

impl Drop for HtmlVideoMedia {
    fn drop(&mut self) {
        self.video.set_oncanplay(None);
        self.video.set_onplay(None);
        self.video.set_onpause(None);
        self.video.set_onended(None);
        self.video.set_onerror(None);
        for source in &self.sources {
            source.set_onerror(None);
        }
        let _ = self.video.pause();
        self.video.remove();
    }
}

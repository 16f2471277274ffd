use log::{debug, info};

use crate::clipboard::ClipboardWriter;
use crate::command::Command;
use crate::config::SiteConfig;
use crate::env::Environment;
use crate::fallback::render_fallback;
use crate::fetch::Fetcher;
use crate::location::{source_path, ResolveMode, Resolver, ROOT_DOCUMENT};
use crate::prefetch::PrefetchTask;
use crate::toast::Tone;

/// Where copied page text came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContentSource {
    Markdown,
    RenderedPage,
}

/// User-visible outcome of a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notice {
    PageCopied(ContentSource),
    LinkCopied,
    PageDownloaded,
    NoSource,
    NothingToCopy,
    CopyFailed,
    OpenFailed,
    DownloadFailed,
}

impl Notice {
    pub fn message(self) -> &'static str {
        match self {
            Notice::PageCopied(ContentSource::Markdown) => "Copied page as Markdown",
            Notice::PageCopied(ContentSource::RenderedPage) => "Copied page text",
            Notice::LinkCopied => "Copied link to Markdown source",
            Notice::PageDownloaded => "Downloaded page as Markdown",
            Notice::NoSource => "No Markdown source found for this page",
            Notice::NothingToCopy => "Nothing to copy on this page",
            Notice::CopyFailed => "Copy failed",
            Notice::OpenFailed => "Could not open a new tab",
            Notice::DownloadFailed => "Download failed",
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            Notice::PageCopied(_) | Notice::LinkCopied | Notice::PageDownloaded => Tone::Success,
            _ => Tone::Failure,
        }
    }
}

/// Copy that the legacy mechanism could not complete inside the gesture.
#[derive(Debug)]
pub struct DeferredCopy {
    text: String,
    success: Notice,
}

#[derive(Debug)]
pub enum Dispatch {
    /// Not a recognized command; the triggering event should be left alone.
    Ignored,
    /// Finished synchronously. Any notice has already been shown.
    Done(Option<Notice>),
    /// Needs [`Dispatcher::finish`] to try the async clipboard API.
    Deferred(DeferredCopy),
}

pub struct Dispatcher<E: Environment> {
    env: E,
    config: SiteConfig,
    fetcher: Fetcher,
}

impl<E: Environment> Dispatcher<E> {
    pub fn new(env: E, config: SiteConfig, fetcher: Fetcher) -> Self {
        Self {
            env,
            config,
            fetcher,
        }
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    /// Prefetch work for the page currently shown, if anything is left to fetch.
    pub fn prefetch_task(&self) -> Option<PrefetchTask> {
        PrefetchTask::for_current_page(&self.env, &self.config, &self.fetcher)
    }

    pub fn dispatch_id(&self, id: &str) -> Dispatch {
        match Command::from_id(id) {
            Some(command) => self.dispatch(command),
            None => {
                debug!("ignoring unknown command {id:?}");
                Dispatch::Ignored
            }
        }
    }

    /// Runs the synchronous part of `command`. Call from the event handler
    /// itself: the blocking fetch and the legacy copy only work while the
    /// user gesture is still on the stack.
    pub fn dispatch(&self, command: Command) -> Dispatch {
        info!("running {}", command.id());
        match command {
            Command::CopyPage => match self.page_markdown() {
                Some((text, source)) => self.copy(text, Notice::PageCopied(source)),
                None => self.done(Notice::NothingToCopy),
            },
            Command::CopyLink => match self.remote_source() {
                Some(url) => self.copy(url, Notice::LinkCopied),
                None => self.done(Notice::NoSource),
            },
            Command::ViewRaw => match self.remote_source() {
                Some(url) => self.open(&url),
                None => self.done(Notice::NoSource),
            },
            Command::OpenAssistant(assistant) => match self.remote_source() {
                Some(url) => self.open(&assistant.launch_url(&url)),
                None => self.done(Notice::NoSource),
            },
            Command::DownloadPage => match self.page_markdown() {
                Some((text, _)) => {
                    if self.env.save_file(&self.download_name(), &text) {
                        self.done(Notice::PageDownloaded)
                    } else {
                        self.done(Notice::DownloadFailed)
                    }
                }
                None => self.done(Notice::NothingToCopy),
            },
        }
    }

    /// Completes a deferred copy through the async clipboard API.
    pub async fn finish(&self, deferred: DeferredCopy) -> Notice {
        let writer = ClipboardWriter::new(&self.env);
        let notice = match writer.copy_async(&deferred.text).await {
            Ok(_) => deferred.success,
            Err(_) => Notice::CopyFailed,
        };
        self.env.notify(notice);
        notice
    }

    /// `dispatch` followed by `finish` when needed.
    #[cfg(test)]
    pub async fn run(&self, command: Command) -> Option<Notice> {
        match self.dispatch(command) {
            Dispatch::Ignored => None,
            Dispatch::Done(notice) => notice,
            Dispatch::Deferred(deferred) => Some(self.finish(deferred).await),
        }
    }

    /// Page text to copy: cached or fetched Markdown, else the rendered page.
    fn page_markdown(&self) -> Option<(String, ContentSource)> {
        let urls = Resolver::new(&self.config).candidates(&self.env, self.config.copy_mode);
        if let Some(document) = self.fetcher.fetch_first_blocking(&self.env, &urls) {
            return Some((document.as_str().to_string(), ContentSource::Markdown));
        }

        debug!("no Markdown source available; converting rendered content");
        let snapshot = self.env.content_snapshot()?;
        let text = render_fallback(snapshot, &self.config.prune);
        (!text.is_empty()).then_some((text, ContentSource::RenderedPage))
    }

    fn remote_source(&self) -> Option<String> {
        Resolver::new(&self.config).resolve(&self.env, ResolveMode::RemoteFirst)
    }

    fn download_name(&self) -> String {
        let base_path = self.config.normalized_base_path();
        let path = source_path(&self.env.pathname(), base_path.as_deref());
        let mut segments = path.rsplit('/');
        match (segments.next(), segments.next()) {
            (Some(ROOT_DOCUMENT), Some(parent)) => format!("{parent}.md"),
            (Some(file), _) => file.to_string(),
            (None, _) => ROOT_DOCUMENT.to_string(),
        }
    }

    fn copy(&self, text: String, success: Notice) -> Dispatch {
        match ClipboardWriter::new(&self.env).copy_in_gesture(&text) {
            Ok(_) => self.done(success),
            Err(_) => Dispatch::Deferred(DeferredCopy { text, success }),
        }
    }

    fn open(&self, url: &str) -> Dispatch {
        if self.env.open_tab(url) {
            Dispatch::Done(None)
        } else {
            self.done(Notice::OpenFailed)
        }
    }

    fn done(&self, notice: Notice) -> Dispatch {
        self.env.notify(notice);
        Dispatch::Done(Some(notice))
    }
}

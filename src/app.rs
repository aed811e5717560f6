//! # Application Controller
//!
//! Wires the photo and geocoding controllers to the terminal. One-shot
//! commands trigger a single request and print the settled result. The
//! interactive loop reads lines from an input stream while requests are in
//! flight and prints every result as it lands.

use crate::cmd_args::{Command, CommandLineArgs};
use crate::config::{self, Profile};
use crate::endpoints::{GeocodingEndpoint, GeocodingForm, PhotosController, PhotosEndpoint};
use crate::lifecycle::{ControllerSnapshot, HttpJsonSource, JsonSource, RequestState};
use crate::render;
use anyhow::Result;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

const PROMPT: &str = "city> ";

/// One parsed line of interactive input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractiveInput {
    FetchPhotos,
    Quit,
    /// Anything else is a city query, sent exactly as typed
    City(String),
}

impl InteractiveInput {
    pub fn parse(line: &str) -> Self {
        match line.trim_end_matches(['\r', '\n']) {
            ":photos" => InteractiveInput::FetchPhotos,
            ":q" | ":quit" => InteractiveInput::Quit,
            city => InteractiveInput::City(city.to_string()),
        }
    }
}

pub struct AppController<W: Write> {
    photos: PhotosController,
    geocoding: GeocodingForm,
    verbose: bool,
    output: W,
}

impl AppController<std::io::Stdout> {
    /// Build from command line arguments and the configured profile
    pub fn new(cmd_args: &CommandLineArgs) -> Result<Self> {
        let profile = resolve_profile(cmd_args, &config::get_profile_path())?;
        let source: Arc<dyn JsonSource> = Arc::new(HttpJsonSource::new());
        Ok(Self::with_output(
            &profile,
            source,
            cmd_args.verbose(),
            std::io::stdout(),
        ))
    }
}

/// Load the selected profile and apply command line overrides on top of it
pub fn resolve_profile(cmd_args: &CommandLineArgs, profile_path: &str) -> Result<Profile> {
    let mut profile = config::load_profile(cmd_args.profile(), profile_path)?;
    if let Command::Photos { limit: Some(limit) } = cmd_args.command() {
        tracing::debug!("Photo limit overridden to {} on the command line", limit);
        profile.photos_limit = *limit;
    }
    Ok(profile)
}

impl<W: Write> AppController<W> {
    /// Create with an injected source and output writer
    pub fn with_output(
        profile: &Profile,
        source: Arc<dyn JsonSource>,
        verbose: bool,
        output: W,
    ) -> Self {
        let photos = PhotosController::new(
            PhotosEndpoint::new(profile.photos_url.clone(), profile.photos_limit),
            Arc::clone(&source),
        );
        let geocoding = GeocodingForm::new(
            GeocodingEndpoint::new(
                profile.geocoding_url.clone(),
                profile.geocoding_limit,
                profile.api_key.clone(),
            ),
            source,
        );

        Self {
            photos,
            geocoding,
            verbose,
            output,
        }
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn photos(&self) -> &PhotosController {
        &self.photos
    }

    pub fn geocoding(&self) -> &GeocodingForm {
        &self.geocoding
    }

    /// Run a command. Returns true when the request succeeded (always true
    /// for the interactive loop).
    pub async fn run(&mut self, command: &Command) -> Result<bool> {
        match command {
            Command::Photos { .. } => self.fetch_photos_once().await,
            Command::Geocode { city } => self.geocode_once(city).await,
            Command::Interactive => {
                let prompt = atty::is(atty::Stream::Stdin);
                let stdin = tokio::io::BufReader::new(tokio::io::stdin());
                self.run_interactive(stdin, prompt).await?;
                Ok(true)
            }
        }
    }

    pub async fn fetch_photos_once(&mut self) -> Result<bool> {
        self.photos.trigger(());
        self.emit_pending(render::FETCH_LABEL)?;
        let succeeded = !matches!(self.photos.settled().await, RequestState::Failed(_));
        self.emit_photos()?;
        Ok(succeeded)
    }

    pub async fn geocode_once(&mut self, city: &str) -> Result<bool> {
        self.geocoding.set_query(city);
        self.geocoding.submit();
        self.emit_pending(render::SEARCH_LABEL)?;
        let succeeded = !matches!(
            self.geocoding.controller_mut().settled().await,
            RequestState::Failed(_)
        );
        self.emit_city()?;
        Ok(succeeded)
    }

    /// Read commands from `input` until `:q` or end of input. Results are
    /// printed as they settle; a new trigger supersedes the one in flight.
    pub async fn run_interactive<R>(&mut self, input: R, prompt: bool) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        if prompt {
            writeln!(
                self.output,
                "Type a city name and press Enter. ':photos' fetches thumbnails, ':q' quits."
            )?;
            if !self.geocoding.has_api_key() {
                writeln!(
                    self.output,
                    "No API key set ({}); city lookups will be refused by the server.",
                    config::API_KEY_ENV_VAR
                )?;
            }
            self.prompt(prompt)?;
        }

        let mut lines = input.lines();
        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        tracing::debug!("Input closed");
                        break;
                    };
                    match InteractiveInput::parse(&line) {
                        InteractiveInput::Quit => break,
                        InteractiveInput::FetchPhotos => {
                            self.photos.trigger(());
                            self.emit_pending(render::FETCH_LABEL)?;
                        }
                        InteractiveInput::City(city) => {
                            self.geocoding.set_query(city);
                            self.geocoding.submit();
                            self.emit_pending(render::SEARCH_LABEL)?;
                        }
                    }
                    self.prompt(prompt)?;
                }
                _ = self.photos.changed() => {
                    self.emit_photos()?;
                    self.prompt(prompt)?;
                }
                _ = self.geocoding.controller_mut().changed() => {
                    self.emit_city()?;
                    self.prompt(prompt)?;
                }
            }
        }

        // Let whatever is still in flight finish so piped input sees every result
        if self.photos.state().is_pending() {
            self.photos.settled().await;
            self.emit_photos()?;
        }
        if self.geocoding.state().is_pending() {
            self.geocoding.controller_mut().settled().await;
            self.emit_city()?;
        }
        Ok(())
    }

    fn prompt(&mut self, enabled: bool) -> Result<()> {
        if enabled {
            write!(self.output, "{PROMPT}")?;
            self.output.flush()?;
        }
        Ok(())
    }

    fn emit_pending(&mut self, label: &str) -> Result<()> {
        writeln!(self.output, "{label} {}", render::LOADING_INDICATOR)?;
        Ok(())
    }

    fn emit_photos(&mut self) -> Result<()> {
        let snapshot = self.photos.snapshot();
        let text = render::render_photos(&snapshot);
        let summary = self.summary(&snapshot);
        self.emit(summary, text)
    }

    fn emit_city(&mut self) -> Result<()> {
        let snapshot = self.geocoding.snapshot();
        let text = render::render_city(&snapshot);
        let summary = self.summary(&snapshot);
        self.emit(summary, text)
    }

    fn summary<P>(&self, snapshot: &ControllerSnapshot<'_, P>) -> Option<String> {
        if self.verbose {
            render::request_summary(snapshot)
        } else {
            None
        }
    }

    fn emit(&mut self, summary: Option<String>, text: String) -> Result<()> {
        if let Some(summary) = summary {
            writeln!(self.output, "{summary}")?;
        }
        writeln!(self.output, "{text}")?;
        self.output.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Scripted, ScriptedSource};
    use serde_json::json;
    use tempfile::NamedTempFile;

    fn profile_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn path_of(file: &NamedTempFile) -> &str {
        file.path().to_str().unwrap()
    }

    #[test]
    fn resolve_profile_should_apply_photos_limit_override() {
        let file = profile_file("[dev]\nphotos_limit = 7\ngeocoding_limit = 2\n");

        let args = CommandLineArgs::parse_from(["program", "-p", "dev", "photos", "--limit", "3"]);
        let profile = resolve_profile(&args, path_of(&file)).unwrap();
        assert_eq!(profile.photos_limit, 3);
        assert_eq!(profile.geocoding_limit, 2);

        let args = CommandLineArgs::parse_from(["program", "-p", "dev", "photos"]);
        let profile = resolve_profile(&args, path_of(&file)).unwrap();
        assert_eq!(profile.photos_limit, 7);
    }

    #[tokio::test]
    async fn photos_limit_override_should_reach_request_url() {
        let file = profile_file("[default]\nphotos_limit = 7\n");
        let args = CommandLineArgs::parse_from(["program", "photos", "-l", "3"]);
        let profile = resolve_profile(&args, path_of(&file)).unwrap();

        let source = Arc::new(ScriptedSource::new([Scripted::ok(json!([]))]));
        let mut app = AppController::with_output(&profile, source.clone(), false, Vec::new());
        assert!(app.run(args.command()).await.unwrap());

        assert_eq!(
            source.requested_urls()[0].as_str(),
            "https://jsonplaceholder.typicode.com/photos?_limit=3"
        );
    }

    #[test]
    fn interactive_input_should_recognize_commands() {
        assert_eq!(InteractiveInput::parse(":photos"), InteractiveInput::FetchPhotos);
        assert_eq!(InteractiveInput::parse(":q"), InteractiveInput::Quit);
        assert_eq!(InteractiveInput::parse(":quit\r\n"), InteractiveInput::Quit);
    }

    #[test]
    fn interactive_input_should_keep_city_text_verbatim() {
        assert_eq!(
            InteractiveInput::parse("  New York "),
            InteractiveInput::City("  New York ".to_string())
        );
        assert_eq!(InteractiveInput::parse(""), InteractiveInput::City(String::new()));
    }
}

use super::Notebook;
use crate::error::AppError;
use crate::schedule::{colorize, render_html, ScriptLine, SpeakerSet};
use crate::store::SheetStore;

impl<S: SheetStore> Notebook<S> {
    pub fn speakers(&self) -> &SpeakerSet {
        &self.speakers
    }

    /// Speaker-tagged lines of one episode's script.
    pub fn script_preview(&self, index: usize) -> Result<Vec<ScriptLine>, AppError> {
        let episode = self.episode(index)?;
        Ok(colorize(Some(&episode.script), &self.speakers))
    }

    pub fn script_html(&self, index: usize) -> Result<String, AppError> {
        let lines = self.script_preview(index)?;
        Ok(render_html(&lines, &self.speakers))
    }
}

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use shifting_maze_core::{Command, Event, Stage, StageIndex, WELCOME_BANNER};
use shifting_maze_persistence::SaveFile;
use shifting_maze_session::{self as session, query, Session};
use shifting_maze_system_progress::Progress;
use shifting_maze_system_stage_select::{StageSelect, StageSelectInput};
use tracing::{debug, info, warn};

use crate::{
    board,
    input::{self, HostCommand, HELP},
    messages,
};

/// Whether the prompt loop keeps running after a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Terminal host wiring the session to progress tracking and the save file.
#[derive(Debug)]
pub(crate) struct App {
    session: Session,
    progress: Progress,
    select: StageSelect,
    save: SaveFile,
}

impl App {
    /// Creates the host at the first stage with progress read from `save`.
    pub(crate) fn new(stages: Vec<Stage>, save: SaveFile) -> Result<Self> {
        let unlocked = save
            .load()
            .with_context(|| format!("failed to load progress from {}", save.path().display()))?;
        let session = Session::new(stages)?;
        let stage_count = query::stage_count(&session);
        info!(
            stages = stage_count,
            unlocked_stage = unlocked.unlocked_stage(),
            "session ready"
        );

        Ok(Self {
            session,
            progress: Progress::new(unlocked),
            select: StageSelect::new(unlocked, stage_count),
            save,
        })
    }

    /// Switches to `stage` before the prompt loop starts, failing when it is locked.
    pub(crate) fn start_at(&mut self, stage: StageIndex) -> Result<()> {
        let mut commands = Vec::new();
        self.select
            .handle(&[], StageSelectInput::choose(stage), &mut commands)?;
        let mut events = Vec::new();
        for command in commands {
            session::apply(&mut self.session, command, &mut events);
        }
        Ok(())
    }

    /// Runs the prompt loop until the player quits or `input` ends, then saves progress.
    pub(crate) fn run(&mut self, input: impl BufRead, mut output: impl Write) -> Result<()> {
        writeln!(output, "{WELCOME_BANNER} Type `help` for the list of commands.")?;
        self.write_board(&mut output)?;

        for line in input.lines() {
            let line = line.context("failed to read from standard input")?;
            let command = match input::parse_command(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(error) => {
                    writeln!(output, "{error}")?;
                    continue;
                }
            };

            if self.execute(command, &mut output)? == Flow::Quit {
                break;
            }
        }

        self.persist(&mut output)?;
        writeln!(output, "Goodbye.")?;
        Ok(())
    }

    fn execute(&mut self, command: HostCommand, output: &mut impl Write) -> Result<Flow> {
        debug!(?command, "host command");
        match command {
            HostCommand::Move(direction) => self.apply(Command::Move { direction }, output)?,
            HostCommand::Undo => self.apply(Command::Undo, output)?,
            HostCommand::Redo => self.apply(Command::Redo, output)?,
            HostCommand::ResetStage => {
                let stage = query::stage_index(&self.session);
                self.apply(Command::Reset { stage }, output)?;
            }
            HostCommand::SelectStage(stage) => self.select_stage(stage, output)?,
            HostCommand::ListStages => self.write_stages(output)?,
            HostCommand::Help => writeln!(output, "{HELP}")?,
            HostCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn apply(&mut self, command: Command, output: &mut impl Write) -> Result<()> {
        let mut events = Vec::new();
        session::apply(&mut self.session, command, &mut events);

        let mut unlocked = Vec::new();
        self.progress.handle(
            &events,
            query::stage_count(&self.session),
            &mut unlocked,
        );
        if !unlocked.is_empty() {
            self.select
                .handle(&unlocked, StageSelectInput::default(), &mut Vec::new())?;
        }

        self.write_events(events.iter().chain(&unlocked), output)?;
        if !unlocked.is_empty() {
            self.persist(output)?;
        }
        self.write_board(output)
    }

    fn select_stage(&mut self, stage: StageIndex, output: &mut impl Write) -> Result<()> {
        let mut commands = Vec::new();
        if let Err(error) = self
            .select
            .handle(&[], StageSelectInput::choose(stage), &mut commands)
        {
            writeln!(output, "Cannot play that stage: {error}.")?;
            return Ok(());
        }

        for command in commands {
            self.apply(command, output)?;
        }
        Ok(())
    }

    /// Saves progress; a failed save is reported and play continues.
    fn persist(&self, output: &mut impl Write) -> Result<()> {
        let progress = self.progress.progress();
        if let Err(error) = self.save.save(&progress) {
            let error = anyhow::Error::new(error);
            warn!(
                path = %self.save.path().display(),
                unlocked_stage = progress.unlocked_stage(),
                "failed to save progress: {error:#}"
            );
            writeln!(output, "Progress could not be saved: {error:#}")?;
        }
        Ok(())
    }

    fn write_events<'a>(
        &self,
        events: impl Iterator<Item = &'a Event>,
        output: &mut impl Write,
    ) -> Result<()> {
        for event in events {
            if let Some(message) = messages::describe(event, &self.session) {
                writeln!(output, "{message}")?;
            }
        }
        Ok(())
    }

    fn write_board(&self, output: &mut impl Write) -> Result<()> {
        write!(output, "{}", board::render_board(&self.session))?;
        writeln!(output, "{}", board::status_line(&self.session))?;
        Ok(())
    }

    fn write_stages(&self, output: &mut impl Write) -> Result<()> {
        let stages = query::stages(&self.session);
        for entry in self.select.entries() {
            let name = stages
                .get(entry.stage.get())
                .map_or("", |stage| stage.name());
            let state = if entry.unlocked { "unlocked" } else { "locked" };
            writeln!(output, "{:>3}. {name} ({state})", entry.stage.get() + 1)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shifting_maze_core::{ChangeInterval, GridSize, MazeGrid, World};
    use std::{fs, io::Cursor};
    use tempfile::TempDir;

    fn stage(name: &str, rows: [&str; 2]) -> Stage {
        let grid = MazeGrid::from_symbol_rows(GridSize::new(3, 2), rows).expect("layout fits");
        let interval = ChangeInterval::new(5).expect("positive");
        Stage::new(name, vec![World::new(grid, interval)]).expect("valid stage")
    }

    fn app(dir: &TempDir) -> App {
        let stages = vec![
            stage("first", ["S0G", "111"]),
            stage("second", ["S01", "G11"]),
            stage("third", ["SG1", "111"]),
        ];
        App::new(stages, SaveFile::new(dir.path().join("save.json"))).expect("app starts")
    }

    fn play(app: &mut App, script: &str) -> String {
        let mut output = Vec::new();
        app.run(Cursor::new(script), &mut output)
            .expect("session runs");
        String::from_utf8(output).expect("output is UTF-8")
    }

    #[test]
    fn clearing_a_stage_unlocks_and_saves_the_next() {
        let dir = TempDir::new().expect("temp dir");
        let mut app = app(&dir);

        let output = play(&mut app, "d\nd\n");

        assert!(output.contains("Goal reached! You cleared first."));
        assert!(output.contains("Stage 2 is now unlocked."));
        assert_eq!(app.progress.progress().unlocked_stage(), 2);

        let saved = SaveFile::new(dir.path().join("save.json"))
            .load()
            .expect("save file is readable");
        assert_eq!(saved.unlocked_stage(), 2);
    }

    #[test]
    fn failed_save_is_reported_and_play_continues() {
        let dir = TempDir::new().expect("temp dir");
        let save_dir = dir.path().join("slot");
        let stages = vec![
            stage("first", ["S0G", "111"]),
            stage("second", ["S01", "G11"]),
        ];
        let mut app =
            App::new(stages, SaveFile::new(save_dir.join("save.json"))).expect("app starts");
        fs::write(&save_dir, "not a directory").expect("blocking file is written");

        let mut output = Vec::new();
        let result = app.run(Cursor::new("d\nd\nu\nstages\n"), &mut output);
        let output = String::from_utf8(output).expect("output is UTF-8");

        assert!(result.is_ok(), "save failures must not end the session");
        assert!(output.contains("Goal reached! You cleared first."));
        assert!(output.contains("Stage 2 is now unlocked."));
        assert_eq!(
            output.matches("Progress could not be saved").count(),
            2,
            "both the unlock save and the exit save are reported"
        );
        assert!(output.contains("Undo: world 1, player at (1, 0)."));
        assert!(output.contains("  2. second (unlocked)"));
        assert!(output.ends_with("Goodbye.\n"));
        assert_eq!(app.progress.progress().unlocked_stage(), 2);
    }

    #[test]
    fn locked_stages_cannot_be_selected() {
        let dir = TempDir::new().expect("temp dir");
        let mut app = app(&dir);

        let output = play(&mut app, "stage 3\nstages\nq\n");

        assert!(output.contains("Cannot play that stage: stage 3 is still locked."));
        assert!(output.contains("  1. first (unlocked)"));
        assert!(output.contains("  3. third (locked)"));
        assert_eq!(query::stage_index(&app.session), StageIndex::FIRST);
    }

    #[test]
    fn start_at_rejects_locked_stage() {
        let dir = TempDir::new().expect("temp dir");
        let mut app = app(&dir);

        assert!(app.start_at(StageIndex::new(1)).is_err());
        assert!(app.start_at(StageIndex::FIRST).is_ok());
    }

    #[test]
    fn unknown_input_keeps_the_loop_running() {
        let dir = TempDir::new().expect("temp dir");
        let mut app = app(&dir);

        let output = play(&mut app, "fly\nd\nq\nd\n");

        assert!(output.contains("unknown command `fly`"));
        assert_eq!(
            query::move_count(&app.session),
            1,
            "commands after quit are ignored"
        );
        assert!(output.ends_with("Goodbye.\n"));
    }
}

// Interactive command loop

use anyhow::Context;
use fatlens_core::ImageReader;
use fatlens_filesystems::{find_file, list_tree, read_volume_label, Fat16Session};
use log::debug;
use std::io::{BufRead, Write};
use std::path::Path;

const MENU: &str = "Type your command, then [enter]
Available commands:
l      Print label of FAT16_IMAGE_FILE
i      Iterate file system and print the name of all directories/files
f FILE Print content of FILE
q      quit the program.
";

/// Longest name accepted after `f `.
const MAX_NAME_LEN: usize = 12;

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Label,
    Iterate,
    Find(String),
    Quit,
    Blank,
    Unknown(char),
}

impl Command {
    /// The first non-blank character of the line selects the command.
    pub fn parse(line: &str) -> Self {
        let line = line.trim_start_matches([' ', '\t']);
        let mut chars = line.chars();
        match chars.next() {
            None | Some('\n') | Some('\r') => Command::Blank,
            Some('l') => Command::Label,
            Some('i') => Command::Iterate,
            Some('q') => Command::Quit,
            Some('f') => {
                // One separator character, then at most twelve name characters
                chars.next();
                let name: String = chars.take(MAX_NAME_LEN).collect();
                Command::Find(name.trim_end_matches(['\n', '\r']).to_string())
            }
            Some(other) => Command::Unknown(other),
        }
    }
}

fn print_menu<W: Write>(out: &mut W) -> std::io::Result<()> {
    out.write_all(MENU.as_bytes())?;
    out.flush()
}

/// Open the image for one command only; the handle and FAT are released
/// when the command returns, error or not.
fn execute<W: Write>(image: &Path, command: &Command, out: &mut W) -> anyhow::Result<()> {
    match command {
        Command::Label => {
            let mut reader = ImageReader::open(image)
                .with_context(|| format!("Failed to open image {}", image.display()))?;
            let label = read_volume_label(&mut reader)?;
            out.write_all(b"The Label of the given FAT16 file system is: \"")?;
            out.write_all(label.as_bytes())?;
            out.write_all(b"\"\n")?;
        }
        Command::Iterate => {
            let mut session = Fat16Session::open(image)
                .with_context(|| format!("Failed to open FAT16 image {}", image.display()))?;
            list_tree(&mut session, out)?;
        }
        Command::Find(name) => {
            let mut session = Fat16Session::open(image)
                .with_context(|| format!("Failed to open FAT16 image {}", image.display()))?;
            let matches = find_file(&mut session, name, out)?;
            debug!("{} match(es) for {:?}", matches, name);
        }
        Command::Quit | Command::Blank | Command::Unknown(_) => {}
    }
    Ok(())
}

/// Read commands from `input` until `q` or end of input.
pub fn run<R: BufRead, W: Write>(image: &Path, mut input: R, mut out: W) -> anyhow::Result<()> {
    print_menu(&mut out)?;

    let mut line = String::new();
    loop {
        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(());
        }

        let command = Command::parse(&line);
        debug!("Command: {:?}", command);
        match command {
            Command::Quit => return Ok(()),
            Command::Blank => {}
            ref command => {
                execute(image, command, &mut out)?;
                out.write_all(b"\n")?;
            }
        }
        print_menu(&mut out)?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fatlens_filesystems::fat_common::attributes::*;
    use fatlens_filesystems::test_helpers::ImageBuilder;
    use std::io::Cursor;
    use tempfile::NamedTempFile;

    fn write_image(builder: &ImageBuilder) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&builder.build()).unwrap();
        file.flush().unwrap();
        file
    }

    fn session_output(image: &Path, input: &str) -> String {
        let mut out = Vec::new();
        run(image, Cursor::new(input.as_bytes()), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn hello_image() -> NamedTempFile {
        let mut builder = ImageBuilder::new();
        builder.set_label(b"MYDISK     ");
        builder.root_entry(0, "HELLO.TXT", ATTR_ARCHIVE, 2, 5);
        builder.chain(&[2]);
        builder.write_clusters(&[2], b"abcde......................");
        write_image(&builder)
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("l\n"), Command::Label);
        assert_eq!(Command::parse("  i\n"), Command::Iterate);
        assert_eq!(Command::parse("q\n"), Command::Quit);
        assert_eq!(Command::parse("\n"), Command::Blank);
        assert_eq!(Command::parse("   \r\n"), Command::Blank);
        assert_eq!(Command::parse("x\n"), Command::Unknown('x'));
    }

    #[test]
    fn test_parse_find_name() {
        assert_eq!(Command::parse("f HELLO.TXT\n"), Command::Find("HELLO.TXT".into()));
        assert_eq!(Command::parse("f ABCDEFGH.IJK\n"), Command::Find("ABCDEFGH.IJK".into()));
        assert_eq!(Command::parse("f ABCDEFGH.IJKLM\n"), Command::Find("ABCDEFGH.IJK".into()));
        assert_eq!(Command::parse("f A.TXT\r\n"), Command::Find("A.TXT".into()));
        assert_eq!(Command::parse("f\n"), Command::Find(String::new()));
    }

    #[test]
    fn test_label_command() {
        let image = hello_image();
        let expected = format!(
            "{MENU}The Label of the given FAT16 file system is: \"MYDISK     \"\n\n{MENU}"
        );
        assert_eq!(session_output(image.path(), "l\nq\n"), expected);
    }

    #[test]
    fn test_iterate_and_find() {
        let image = hello_image();
        let expected = format!("{MENU}File: HELLO.TXT\n\n{MENU}File: HELLO.TXT\nabcde\n{MENU}");
        assert_eq!(session_output(image.path(), "i\nf HELLO.TXT\nq\n"), expected);
    }

    #[test]
    fn test_find_missing_file_is_silent() {
        let image = hello_image();
        let expected = format!("{MENU}\n{MENU}");
        assert_eq!(session_output(image.path(), "f MISSING.TXT\nq\n"), expected);
    }

    #[test]
    fn test_subdirectory_listing() {
        let mut builder = ImageBuilder::new();
        builder.root_entry(0, "SUBDIR", ATTR_DIRECTORY, 3, 0);
        builder.subdir(3, 0);
        builder.dir_file(3, 2, "A.TXT", &[4], b"a");
        let image = write_image(&builder);

        let expected = format!("{MENU}Dir : SUBDIR\n\tFile: A.TXT\n\n{MENU}");
        assert_eq!(session_output(image.path(), "i\nq\n"), expected);
    }

    #[test]
    fn test_unknown_and_blank_lines() {
        let image = hello_image();
        let expected = format!("{MENU}\n{MENU}{MENU}");
        assert_eq!(session_output(image.path(), "z\n\nq\n"), expected);
    }

    #[test]
    fn test_end_of_input_exits_cleanly() {
        let image = hello_image();
        assert_eq!(session_output(image.path(), ""), MENU);
    }

    #[test]
    fn test_missing_image_is_fatal() {
        let mut out = Vec::new();
        let result = run(
            Path::new("/nonexistent/fatlens.img"),
            Cursor::new(&b"i\n"[..]),
            &mut out,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_truncated_image_is_fatal() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&ImageBuilder::new().build()[..600]).unwrap();

        let mut out = Vec::new();
        let result = run(file.path(), Cursor::new(&b"i\n"[..]), &mut out);
        assert!(result.is_err());
    }
}

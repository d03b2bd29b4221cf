use std::io::{self, BufRead, Write};

use tracing::debug;

use crate::error::AppError;

/// Decides which course an assignment belongs to.
pub trait CourseResolver {
    fn resolve(&mut self, title: &str, courses: &[String]) -> Result<String, AppError>;
}

/// The one course whose name appears in `title`, ignoring case.
///
/// `None` when no course matches or when the title is ambiguous.
pub fn infer_course<'a>(title: &str, courses: &'a [String]) -> Option<&'a String> {
    let title = title.to_uppercase();
    let mut matches = courses
        .iter()
        .filter(|course| !course.is_empty() && title.contains(&course.to_uppercase()));
    let first = matches.next()?;
    match matches.next() {
        Some(_) => None,
        None => Some(first),
    }
}

/// Parses a 1-based menu choice out of `count` options.
pub fn validate_choice(input: &str, count: usize) -> Result<usize, AppError> {
    let choice: usize = input
        .trim()
        .parse()
        .map_err(|_| AppError::InvalidInput(format!("not a number: {:?}", input.trim())))?;
    if (1..=count).contains(&choice) {
        Ok(choice)
    } else {
        Err(AppError::InvalidInput(format!("{} is out of range", choice)))
    }
}

/// Asks the operator on a terminal, unless the title already names a course.
pub struct PromptResolver<R, W> {
    input: R,
    output: W,
}

impl PromptResolver<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> PromptResolver<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn print_courses(&mut self, courses: &[String]) -> Result<(), AppError> {
        writeln!(self.output, "Available courses:")?;
        for (i, course) in courses.iter().enumerate() {
            writeln!(self.output, "\t{} - {}", i + 1, course)?;
        }
        Ok(())
    }
}

impl<R: BufRead, W: Write> CourseResolver for PromptResolver<R, W> {
    fn resolve(&mut self, title: &str, courses: &[String]) -> Result<String, AppError> {
        if courses.is_empty() {
            return Err(AppError::Configuration("no courses configured".to_string()));
        }
        if let Some(course) = infer_course(title, courses) {
            debug!("Inferred course {} for {}", course, title);
            return Ok(course.clone());
        }

        self.print_courses(courses)?;
        loop {
            write!(self.output, "What course belongs to \"{}\"? ", title)?;
            self.output.flush()?;

            let line = read_line(&mut self.input)?;
            match validate_choice(&line, courses.len()) {
                Ok(choice) => return Ok(courses[choice - 1].clone()),
                Err(e) => {
                    debug!("Rejected course choice: {}", e);
                    writeln!(
                        self.output,
                        "Invalid choice. Please enter a number between 1 and {}.",
                        courses.len()
                    )?;
                }
            }
        }
    }
}

/// Reads course names one per line until `done`. Names are upper-cased.
pub fn request_course_names<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> Result<Vec<String>, AppError> {
    let mut courses = Vec::new();
    loop {
        write!(output, "Enter course name (or \"done\" to finish): ")?;
        output.flush()?;
        let line = read_line(input)?;
        let name = line.trim();
        if name == "done" {
            break;
        }
        if !name.is_empty() {
            courses.push(name.to_uppercase());
        }
    }
    Ok(courses)
}

fn read_line<R: BufRead>(input: &mut R) -> Result<String, AppError> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(AppError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "input closed while waiting for an answer",
        )));
    }
    Ok(line)
}

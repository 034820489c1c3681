//! Data structures exchanged with the caller during a game.

use std::{fmt, str::FromStr};

use reqwest::Url;

use crate::{
    Error,
    api::{GuessElement, StepInformation},
};

/// Answer to a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Answer {
    Yes,
    No,
    DontKnow,
    Probably,
    ProbablyNot,
}

impl Answer {
    /// Every answer, ordered by id.
    pub const ALL: [Answer; 5] = [
        Answer::Yes,
        Answer::No,
        Answer::DontKnow,
        Answer::Probably,
        Answer::ProbablyNot,
    ];

    /// Id of the answer on the wire.
    pub fn id(self) -> u8 {
        match self {
            Answer::Yes => 0,
            Answer::No => 1,
            Answer::DontKnow => 2,
            Answer::Probably => 3,
            Answer::ProbablyNot => 4,
        }
    }
}

impl TryFrom<u8> for Answer {
    type Error = Error;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Answer::ALL
            .into_iter()
            .find(|answer| answer.id() == id)
            .ok_or_else(|| Error::InvalidAnswer(id.to_string()))
    }
}

impl FromStr for Answer {
    type Err = Error;

    /// Parses an answer typed by a player.
    ///
    /// Accepted forms, case insensitive:
    /// - `y`, `yes`
    /// - `n`, `no`
    /// - `dk`, `dont know`, `don't know`, `dontknow`, `don'tknow`
    /// - `p`, `probably`
    /// - `pn`, `probably not`, `probablynot`
    ///
    /// # Examples
    ///
    /// ```
    /// use guessr::session::Answer;
    ///
    /// assert_eq!("Don't know".parse::<Answer>().unwrap(), Answer::DontKnow);
    /// assert!("maybe".parse::<Answer>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "y" | "yes" => Ok(Answer::Yes),
            "n" | "no" => Ok(Answer::No),
            "dk" | "dont know" | "don't know" | "dontknow" | "don'tknow" => Ok(Answer::DontKnow),
            "p" | "probably" => Ok(Answer::Probably),
            "pn" | "probably not" | "probablynot" => Ok(Answer::ProbablyNot),
            _ => Err(Error::InvalidAnswer(s.to_owned())),
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let text = match self {
            Answer::Yes => "yes",
            Answer::No => "no",
            Answer::DontKnow => "don't know",
            Answer::Probably => "probably",
            Answer::ProbablyNot => "probably not",
        };
        f.write_str(text)
    }
}

/// Snapshot of the current question.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    /// Id of the question
    pub id: String,
    /// Step of the question, starting at 0
    pub step: u32,
    /// Localized text
    pub text: String,
    /// Progression towards a guess, between 0 and 100
    pub progression: f64,
}

impl From<StepInformation> for Question {
    fn from(step_information: StepInformation) -> Self {
        Question {
            id: step_information.question_id,
            step: step_information.step,
            text: step_information.question,
            progression: step_information.progression,
        }
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{} {}", self.step + 1, self.text)
    }
}

/// Picture path sent for subjects without a picture.
const NO_PICTURE: &str = "none.jpg";

/// A guess of the subject the player thinks about.
///
/// The explicit flag is reported as sent by the server and never used to filter
/// guesses: profanity filtering is done by the server.
#[derive(Debug, Clone, PartialEq)]
pub struct Guess {
    /// Id of the subject
    pub id: String,
    /// Localized name of the subject
    pub name: String,
    /// Probability that the guess is right, between 0 and 1
    pub probability: f64,
    /// Localized description
    pub description: Option<String>,
    /// Picture of the subject
    pub image: Option<Url>,
    /// Whether the server flags the subject as explicit, often wrongly
    pub explicit: bool,
}

impl From<GuessElement> for Guess {
    fn from(element: GuessElement) -> Self {
        let image = element
            .absolute_picture_path
            .filter(|path| !path.ends_with(NO_PICTURE))
            .and_then(|path| Url::parse(&path).ok());

        Guess {
            id: element.id,
            name: element.name,
            probability: element.probability,
            description: element.description.filter(|d| !d.trim().is_empty()),
            image,
            explicit: element.explicit,
        }
    }
}

impl fmt::Display for Guess {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.description {
            Some(description) => write!(
                f,
                "{} ({}) {:.1}%",
                self.name,
                description,
                self.probability * 100.0
            ),
            None => write!(f, "{} {:.1}%", self.name, self.probability * 100.0),
        }
    }
}

/// Lifecycle of an established session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Questions are being answered
    Active,
    /// A guess was suggested and waits for a confirmation or a rejection
    GuessPending,
    /// A guess was confirmed, the game is over
    Terminated,
    /// The server of the session went down, the session cannot be used anymore
    Lost,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(picture: Option<&str>) -> GuessElement {
        GuessElement {
            id: "42".to_owned(),
            name: "Ada Lovelace".to_owned(),
            probability: 0.875,
            description: Some("Mathematician".to_owned()),
            absolute_picture_path: picture.map(str::to_owned),
            explicit: false,
        }
    }

    #[test]
    fn test_answer_ids() {
        let ids: Vec<u8> = Answer::ALL.iter().map(|a| a.id()).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_answer_try_from_id() {
        assert_eq!(Answer::try_from(3).unwrap(), Answer::Probably);
        assert!(matches!(
            Answer::try_from(5),
            Err(Error::InvalidAnswer(value)) if value == "5"
        ));
    }

    #[test]
    fn test_answer_from_str() {
        assert_eq!("y".parse::<Answer>().unwrap(), Answer::Yes);
        assert_eq!("NO".parse::<Answer>().unwrap(), Answer::No);
        assert_eq!("dontknow".parse::<Answer>().unwrap(), Answer::DontKnow);
        assert_eq!(" p ".parse::<Answer>().unwrap(), Answer::Probably);
        assert_eq!("probably not".parse::<Answer>().unwrap(), Answer::ProbablyNot);
        assert_eq!("pn".parse::<Answer>().unwrap(), Answer::ProbablyNot);
    }

    #[test]
    fn test_answer_from_str_invalid() {
        assert!(matches!(
            "perhaps".parse::<Answer>(),
            Err(Error::InvalidAnswer(value)) if value == "perhaps"
        ));
        assert!("".parse::<Answer>().is_err());
    }

    #[test]
    fn test_question_from_step_information() {
        let question = Question::from(StepInformation {
            question: "Is your character a girl?".to_owned(),
            step: 2,
            progression: 10.5,
            question_id: "9".to_owned(),
        });
        assert_eq!(question.step, 2);
        assert_eq!(question.id, "9");
        assert_eq!(question.to_string(), "#3 Is your character a girl?");
    }

    #[test]
    fn test_guess_from_element() {
        let guess = Guess::from(element(Some("https://photos.example/ada.jpg")));
        assert_eq!(guess.id, "42");
        assert_eq!(guess.image.unwrap().as_str(), "https://photos.example/ada.jpg");
        assert_eq!(guess.description.as_deref(), Some("Mathematician"));
    }

    #[test]
    fn test_guess_without_picture() {
        let guess = Guess::from(element(Some("https://photos.example/none.jpg")));
        assert!(guess.image.is_none());

        let guess = Guess::from(element(Some("not a url")));
        assert!(guess.image.is_none());

        let guess = Guess::from(element(None));
        assert!(guess.image.is_none());
    }

    #[test]
    fn test_guess_explicit_flag_is_kept() {
        let mut explicit = element(None);
        explicit.explicit = true;
        assert!(Guess::from(explicit).explicit);
    }

    #[test]
    fn test_guess_display() {
        let guess = Guess::from(element(None));
        assert_eq!(guess.to_string(), "Ada Lovelace (Mathematician) 87.5%");
    }
}

use opencv::{core::Mat, highgui};

use crate::config::DisplayConfig;
use crate::error::Error;
use crate::session::Display;

pub struct Window {
    title: String,
    wait_ms: i32,
}

impl Window {
    pub fn open(config: &DisplayConfig) -> Result<Self, Error> {
        highgui::named_window(&config.window_title, highgui::WINDOW_AUTOSIZE)?;

        Ok(Self {
            title: config.window_title.clone(),
            wait_ms: config.wait_ms.max(1),
        })
    }
}

impl Display<Mat> for Window {
    fn show(&mut self, frame: &Mat) -> Result<(), Error> {
        highgui::imshow(&self.title, frame)?;
        Ok(())
    }

    fn poll_key(&mut self) -> Result<Option<char>, Error> {
        let key = highgui::wait_key(self.wait_ms)?;
        if key < 0 {
            return Ok(None);
        }

        Ok(Some(char::from((key & 0xFF) as u8)))
    }

    fn close(&mut self) -> Result<(), Error> {
        highgui::destroy_all_windows()?;
        Ok(())
    }
}

//! Newsgroup selection and listing (GROUP, NEWGROUPS)

use crate::commands::{self, NewsgroupDetail, NewsgroupOverview};
use crate::{NntpClient, NntpError, Result, codes};
use chrono::{DateTime, TimeZone, Utc};
use tracing::debug;

impl NntpClient {
    /// Select a newsgroup
    ///
    /// Returns the server's article count estimate and number range.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - [`NntpError::NoSuchGroup`] - The newsgroup does not exist
    /// - [`NntpError::Protocol`] - Server returned an unexpected code
    /// - [`NntpError::InvalidResponse`] - Reply is not "number low high name"
    pub async fn group(&self, newsgroup: &str) -> Result<NewsgroupDetail> {
        debug!("Selecting newsgroup: {}", newsgroup);

        let response = {
            let mut session = self.exchange().await?;
            session.send_command(&commands::group(newsgroup)).await?;
            session.read_response().await?
        };

        if response.code == codes::NO_SUCH_GROUP {
            return Err(NntpError::NoSuchGroup(newsgroup.to_string()));
        }
        let response = commands::expect_code(response, &[codes::GROUP_SELECTED])?;

        let detail = commands::parse_group_response(&response.message)?;
        debug!(
            "Group {} selected: {} articles ({}-{})",
            detail.name, detail.number, detail.low, detail.high
        );
        Ok(detail)
    }

    /// List newsgroups created after `since` (RFC 3977 §7.3)
    ///
    /// `since` is sent in GMT whatever its time zone.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - [`NntpError::Protocol`] - Server did not answer 231
    /// - [`NntpError::InvalidResponse`] - A listing line is malformed
    pub async fn newgroups<Tz: TimeZone>(
        &self,
        since: DateTime<Tz>,
    ) -> Result<Vec<NewsgroupOverview>> {
        let since = since.with_timezone(&Utc);
        debug!("Requesting newsgroups created since {}", since);

        let response = {
            let mut session = self.exchange().await?;
            session.send_command(&commands::newgroups(since)).await?;
            session
                .read_multiline_response(&[codes::NEW_NEWSGROUPS_FOLLOW])
                .await?
        };

        let groups = response
            .lines
            .iter()
            .map(|line| commands::parse_newsgroup_overview(line))
            .collect::<Result<Vec<_>>>()?;
        debug!("Retrieved {} new newsgroups", groups.len());
        Ok(groups)
    }
}

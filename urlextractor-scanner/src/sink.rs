use crate::result::DiscoveredLink;
use std::io;

/// Destination for emitted links. Write errors abort the crawl.
pub trait LinkSink {
    /// Called once, after the seed page was fetched and before the first emit.
    fn start(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn emit(&mut self, link: &DiscoveredLink) -> io::Result<()>;
}

impl LinkSink for Vec<String> {
    fn emit(&mut self, link: &DiscoveredLink) -> io::Result<()> {
        self.push(link.url.clone());
        Ok(())
    }
}

impl LinkSink for Vec<DiscoveredLink> {
    fn emit(&mut self, link: &DiscoveredLink) -> io::Result<()> {
        self.push(link.clone());
        Ok(())
    }
}

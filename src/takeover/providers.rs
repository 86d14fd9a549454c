//! Third-party hosting providers checked for dangling DNS.
//!
//! Order matters: the first provider whose DNS evidence matches is the only one
//! evaluated for a page.

use std::net::{IpAddr, Ipv4Addr};

/// How a canonical name identifies a provider. Names are compared in
/// lower-case trailing-dot form.
#[derive(Debug, Clone, Copy)]
pub enum CnameMatch {
    /// The canonical name ends with this suffix
    Suffix(&'static str),
    /// The canonical name is exactly this name
    Exact(&'static str),
}

impl CnameMatch {
    pub fn matches(&self, cname: &str) -> bool {
        match self {
            CnameMatch::Suffix(suffix) => cname.ends_with(suffix),
            CnameMatch::Exact(name) => cname == *name,
        }
    }
}

/// Page content signalling that the provider-side resource is unclaimed.
#[derive(Debug, Clone, Copy)]
pub enum UnclaimedBody {
    /// The body contains any of these strings
    Contains(&'static [&'static str]),
    /// The body is empty
    Empty,
}

impl UnclaimedBody {
    pub fn matches(&self, body: &str) -> bool {
        match self {
            UnclaimedBody::Contains(fingerprints) => fingerprints.iter().any(|f| body.contains(f)),
            UnclaimedBody::Empty => body.is_empty(),
        }
    }
}

/// Takeover heuristic for one provider.
#[derive(Debug, Clone, Copy)]
pub struct ProviderRule {
    /// Tag name for the provider
    pub name: &'static str,
    /// Provider home page, used as the info tag link
    pub website: &'static str,
    /// Any matching canonical name identifies the provider
    pub cnames: &'static [CnameMatch],
    /// Any matching resolved address identifies the provider
    pub addresses: &'static [IpAddr],
    pub unclaimed: UnclaimedBody,
    /// Provider documentation for reclaiming or removing the domain
    pub remediation: &'static str,
}

impl ProviderRule {
    /// True when the DNS evidence points at this provider.
    pub fn identifies(&self, cname: &str, addresses: &[IpAddr]) -> bool {
        self.cnames.iter().any(|m| m.matches(cname))
            || addresses.iter().any(|a| self.addresses.contains(a))
    }
}

const fn v4(a: u8, b: u8, c: u8, d: u8) -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(a, b, c, d))
}

/// All supported providers, in evaluation order.
pub const PROVIDERS: &[ProviderRule] = &[
    ProviderRule {
        name: "GitHub Pages",
        website: "https://pages.github.com/",
        cnames: &[],
        addresses: &[
            v4(185, 199, 108, 153),
            v4(185, 199, 109, 153),
            v4(185, 199, 110, 153),
            v4(185, 199, 111, 153),
        ],
        unclaimed: UnclaimedBody::Contains(&[
            "There isn't a GitHub Pages site here.",
            "For root URLs (like http://example.com/) you must provide an index.html file",
        ]),
        remediation: "https://help.github.com/articles/using-a-custom-domain-with-github-pages/",
    },
    ProviderRule {
        name: "Amazon S3",
        website: "https://aws.amazon.com/s3/",
        cnames: &[CnameMatch::Suffix(".amazonaws.com.")],
        addresses: &[],
        unclaimed: UnclaimedBody::Contains(&["NoSuchBucket", "The specified bucket does not exist"]),
        remediation:
            "https://docs.aws.amazon.com/AmazonS3/latest/dev/website-hosting-custom-domain-walkthrough.html",
    },
    ProviderRule {
        name: "Campaign Monitor",
        website: "https://www.campaignmonitor.com/",
        cnames: &[CnameMatch::Exact("cname.createsend.com.")],
        addresses: &[],
        unclaimed: UnclaimedBody::Contains(&["Double check the URL or "]),
        remediation: "https://help.campaignmonitor.com/custom-domain-names",
    },
    ProviderRule {
        name: "Cargo Collective",
        website: "https://cargocollective.com/",
        cnames: &[CnameMatch::Exact("subdomain.cargocollective.com.")],
        addresses: &[],
        unclaimed: UnclaimedBody::Contains(&["404 Not Found"]),
        remediation: "https://support.2.cargocollective.com/Using-a-Third-Party-Domain",
    },
    ProviderRule {
        name: "FeedPress",
        website: "https://feed.press/",
        cnames: &[CnameMatch::Exact("redirect.feedpress.me.")],
        addresses: &[],
        unclaimed: UnclaimedBody::Contains(&["The feed has not been found."]),
        remediation: "https://support.feed.press/article/61-how-to-create-a-custom-hostname",
    },
    ProviderRule {
        name: "Ghost",
        website: "https://ghost.org/",
        cnames: &[CnameMatch::Suffix(".ghost.io.")],
        addresses: &[],
        unclaimed: UnclaimedBody::Contains(&[
            "The thing you were looking for is no longer here, or never was",
        ]),
        remediation: "https://docs.ghost.org/faq/using-custom-domains/",
    },
    ProviderRule {
        name: "Helpjuice",
        website: "https://helpjuice.com/",
        cnames: &[CnameMatch::Suffix(".helpjuice.com.")],
        addresses: &[],
        unclaimed: UnclaimedBody::Contains(&["We could not find what you're looking for."]),
        remediation: "https://help.helpjuice.com/34339-getting-started/custom-domain",
    },
    ProviderRule {
        name: "HelpScout",
        website: "https://www.helpscout.net/",
        cnames: &[CnameMatch::Suffix(".helpscoutdocs.com.")],
        addresses: &[],
        unclaimed: UnclaimedBody::Contains(&["No settings were found for this company:"]),
        remediation: "https://docs.helpscout.net/article/42-setup-custom-domain",
    },
    ProviderRule {
        name: "Heroku",
        website: "https://www.heroku.com/",
        cnames: &[
            CnameMatch::Suffix(".herokudns.com."),
            CnameMatch::Suffix(".herokuapp.com."),
            CnameMatch::Suffix(".herokussl.com."),
        ],
        addresses: &[],
        unclaimed: UnclaimedBody::Contains(&["No such app"]),
        remediation: "https://devcenter.heroku.com/articles/custom-domains",
    },
    ProviderRule {
        name: "JetBrains",
        website: "https://www.jetbrains.com/",
        cnames: &[CnameMatch::Suffix(".myjetbrains.com.")],
        addresses: &[],
        unclaimed: UnclaimedBody::Contains(&["is not a registered InCloud YouTrack"]),
        remediation: "https://www.jetbrains.com/help/youtrack/incloud/Domain-Settings.html#use-custom-domain-name",
    },
    ProviderRule {
        name: "Microsoft Azure",
        website: "https://azure.microsoft.com/",
        cnames: &[CnameMatch::Suffix(".azurewebsites.net.")],
        addresses: &[],
        unclaimed: UnclaimedBody::Contains(&["404 Web Site not found"]),
        remediation:
            "https://docs.microsoft.com/en-us/azure/app-service/app-service-web-tutorial-custom-domain",
    },
    ProviderRule {
        name: "Readme",
        website: "https://readme.io/",
        cnames: &[
            CnameMatch::Suffix(".readme.io."),
            CnameMatch::Suffix(".readmessl.com."),
        ],
        addresses: &[],
        unclaimed: UnclaimedBody::Contains(&["Project doesnt exist... yet!"]),
        remediation: "https://readme.readme.io/docs/setting-up-custom-domain",
    },
    ProviderRule {
        name: "Surge",
        website: "https://surge.sh/",
        cnames: &[CnameMatch::Exact("na-west1.surge.sh.")],
        addresses: &[v4(45, 55, 110, 124)],
        unclaimed: UnclaimedBody::Contains(&["project not found"]),
        remediation: "https://surge.sh/help/adding-a-custom-domain",
    },
    ProviderRule {
        name: "Tumblr",
        website: "https://www.tumblr.com/",
        cnames: &[CnameMatch::Exact("domains.tumblr.com.")],
        addresses: &[v4(66, 6, 44, 4)],
        unclaimed: UnclaimedBody::Contains(&[
            "Whatever you were looking for doesn't currently exist at this address",
        ]),
        remediation: "https://tumblr.zendesk.com/hc/en-us/articles/231256548-Custom-domains",
    },
    ProviderRule {
        name: "UserVoice",
        website: "https://www.uservoice.com/",
        cnames: &[CnameMatch::Suffix(".uservoice.com.")],
        addresses: &[],
        unclaimed: UnclaimedBody::Contains(&["This UserVoice subdomain is currently available!"]),
        remediation: "https://developer.uservoice.com/docs/site/domain-aliasing/",
    },
    ProviderRule {
        name: "WordPress",
        website: "https://wordpress.com/",
        cnames: &[CnameMatch::Suffix(".wordpress.com.")],
        addresses: &[],
        unclaimed: UnclaimedBody::Contains(&["Do you want to register"]),
        remediation: "https://en.support.wordpress.com/domains/map-subdomain/",
    },
    ProviderRule {
        name: "SmugMug",
        website: "https://www.smugmug.com/",
        cnames: &[CnameMatch::Exact("domains.smugmug.com.")],
        addresses: &[],
        unclaimed: UnclaimedBody::Empty,
        remediation: "https://help.smugmug.com/use-a-custom-domain-BymMexwJVHG",
    },
    ProviderRule {
        name: "Strikingly",
        website: "https://www.strikingly.com/",
        cnames: &[CnameMatch::Suffix(".s.strikinglydns.com.")],
        addresses: &[v4(54, 183, 102, 22)],
        unclaimed: UnclaimedBody::Contains(&["But if you're looking to build your own website,"]),
        remediation:
            "https://support.strikingly.com/hc/en-us/articles/215046947-Connect-Custom-Domain",
    },
    ProviderRule {
        name: "UptimeRobot",
        website: "https://uptimerobot.com/",
        cnames: &[CnameMatch::Exact("stats.uptimerobot.com.")],
        addresses: &[],
        unclaimed: UnclaimedBody::Contains(&[
            "This public status page <b>does not seem to exist</b>.",
        ]),
        remediation: "https://blog.uptimerobot.com/introducing-public-status-pages-yay/",
    },
    ProviderRule {
        name: "Pantheon",
        website: "https://pantheon.io/",
        cnames: &[CnameMatch::Suffix(".pantheonsite.io.")],
        addresses: &[],
        unclaimed: UnclaimedBody::Contains(&["The gods are wise"]),
        remediation: "https://pantheon.io/docs/domains/",
    },
];

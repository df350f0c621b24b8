use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct TechIcon {
    pub icon: &'static str,
    pub language: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Social {
    pub platform: &'static str,
    pub link: &'static str,
}

/// Static biography content shown by the landing page sections.
#[derive(Debug, Serialize)]
pub struct Profile {
    pub name: &'static str,
    pub status: &'static str,
    pub summary: &'static str,
    pub bio: &'static str,
    pub resume: &'static str,
    pub photo: &'static str,
    /// Lines cycled by the hero typewriter.
    pub taglines: &'static [&'static str],
    pub tech_badges: &'static [&'static str],
    /// Fixed, unpaginated "Tech Stack" tab of the gallery.
    pub tech_icons: &'static [TechIcon],
    pub socials: &'static [Social],
}

pub static PROFILE: Profile = Profile {
    name: "Paras Sapariya",
    status: "MCA Student • Open to Opportunities",
    summary: "MCA student with strong foundation in Data Structures, DBMS, Computer Networks \
        and Web Development. Experienced in building full-stack applications and REST APIs.",
    bio: "I am an MCA student at Marwadi University with strong fundamentals in Data \
        Structures, DBMS, Operating Systems, and Computer Networks. I specialize in backend \
        development and full-stack web applications, focusing on scalable APIs, clean \
        architecture, and efficient database design.",
    resume: "/resume/Paras_Sapariya_Resume.pdf",
    photo: "/Photo.png",
    taglines: &[
        "MCA Student at Marwadi University",
        "Full Stack Web Developer",
        "Backend & API Developer",
    ],
    tech_badges: &[
        "HTML",
        "CSS",
        "JavaScript",
        "React",
        "Node.js",
        "Express.js",
        "PHP",
        "ASP.NET",
        "MySQL",
        "MongoDB",
    ],
    tech_icons: &[
        TechIcon { icon: "html.svg", language: "HTML" },
        TechIcon { icon: "css.svg", language: "CSS" },
        TechIcon { icon: "javascript.svg", language: "JavaScript" },
        TechIcon { icon: "tailwind.svg", language: "Tailwind CSS" },
        TechIcon { icon: "reactjs.svg", language: "ReactJS" },
        TechIcon { icon: "vite.svg", language: "Vite" },
        TechIcon { icon: "nodejs.svg", language: "Node.js" },
        TechIcon { icon: "bootstrap.svg", language: "Bootstrap" },
        TechIcon { icon: "firebase.svg", language: "Firebase" },
        TechIcon { icon: "MUI.svg", language: "Material UI" },
        TechIcon { icon: "vercel.svg", language: "Vercel" },
    ],
    socials: &[
        Social { platform: "github", link: "https://github.com/EkiZR" },
        Social { platform: "linkedin", link: "https://www.linkedin.com/in/ekizr/" },
        Social { platform: "instagram", link: "https://www.instagram.com/ekizr_/?hl=id" },
    ],
};

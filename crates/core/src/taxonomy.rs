//! Fixed category order, extension sets and the two-level industry taxonomy.
//!
//! Tables are slices, not maps: declaration order is the evaluation order
//! and the first matching entry wins.

/// Display/priority order of category buckets; 其他 is the trailing catch-all.
pub const CATEGORY_ORDER: [&str; 10] = [
    "汇报PPT",
    "解决方案文档",
    "招标文档",
    "投标文档",
    "报价文档",
    "合同文档",
    "标准规范",
    "视频",
    "图安资质",
    "其他",
];

pub const CATCH_ALL_CATEGORY: &str = "其他";

pub const VIDEO_EXT: [&str; 6] = [".mp4", ".avi", ".mov", ".mkv", ".wmv", ".flv"];
pub const EXCEL_EXT: [&str; 2] = [".xls", ".xlsx"];
pub const PPT_EXT: [&str; 2] = [".ppt", ".pptx"];
pub const DOC_EXT: [&str; 5] = [".doc", ".docx", ".pdf", ".ppt", ".pptx"];

/// AI keywords checked against the filename alone. A hit here short-circuits
/// the rest of the industry cascade.
pub const AI_FILE_KEYWORDS: [&str; 5] = ["ai", "人工智能", "aigc", "大模型", "llm"];

pub const AI_PRIMARY: &str = "AI赋能";
pub const OTHER_INDUSTRY: &str = "其他行业";
pub const OTHER_SUBTAG: &str = "其他";

pub struct SubTag {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
}

pub struct PrimaryTag {
    pub name: &'static str,
    pub sub_tags: &'static [SubTag],
}

/// Structured primaries scanned after the AI short-circuit, in this order.
pub const STRUCTURED_PRIMARIES: [&str; 4] = ["安全生产", "智慧园区", "应急管理", "车路协同"];

pub const TAG_TREE: &[PrimaryTag] = &[
    PrimaryTag {
        name: AI_PRIMARY,
        sub_tags: &[
            SubTag {
                name: "AI视频分析一体机",
                keywords: &["ai视频", "视频分析一体机", "智能视频"],
            },
            SubTag {
                name: "应急大模型",
                keywords: &["应急大模型", "大模型", "llm", "aigc"],
            },
            SubTag {
                name: "化工园区AI赋能",
                keywords: &["化工园区ai", "化工 ai", "危化 ai"],
            },
            SubTag {
                name: "应急领域AI赋能",
                keywords: &["应急 ai", "应急领域ai", "应急智能"],
            },
        ],
    },
    PrimaryTag {
        name: "安全生产",
        sub_tags: &[
            SubTag {
                name: "HSE",
                keywords: &["hse"],
            },
            SubTag {
                name: "安全生产标准化",
                keywords: &["安全生产标准化"],
            },
            SubTag {
                name: "重大危险源",
                keywords: &["重大危险源"],
            },
            SubTag {
                name: "双重预防",
                keywords: &["双重预防"],
            },
            SubTag {
                name: "特殊作业",
                keywords: &["特殊作业", "动火", "受限空间"],
            },
            SubTag {
                name: "人员定位",
                keywords: &["人员定位"],
            },
            SubTag {
                name: "承包商",
                keywords: &["承包商"],
            },
            SubTag {
                name: "教育培训",
                keywords: &["教育培训", "培训"],
            },
            SubTag {
                name: "6+5",
                keywords: &["6+5"],
            },
        ],
    },
    PrimaryTag {
        name: "智慧园区",
        sub_tags: &[
            SubTag {
                name: "化工园区",
                keywords: &["化工园区"],
            },
            SubTag {
                name: "经开区",
                keywords: &["经开区", "开发区"],
            },
        ],
    },
    PrimaryTag {
        name: "应急管理",
        sub_tags: &[
            SubTag {
                name: "应急指挥",
                keywords: &["应急指挥"],
            },
            SubTag {
                name: "应急演练",
                keywords: &["应急演练"],
            },
            SubTag {
                name: "应急推演",
                keywords: &["应急推演"],
            },
        ],
    },
    PrimaryTag {
        name: "车路协同",
        sub_tags: &[
            SubTag {
                name: "智慧高速",
                keywords: &["智慧高速"],
            },
            SubTag {
                name: "智慧隧道",
                keywords: &["智慧隧道"],
            },
            SubTag {
                name: "智慧桥梁",
                keywords: &["智慧桥梁"],
            },
            SubTag {
                name: "智慧服务区",
                keywords: &["智慧服务区"],
            },
            SubTag {
                name: "智慧收费站",
                keywords: &["智慧收费站"],
            },
            SubTag {
                name: "智慧停车场",
                keywords: &["智慧停车场"],
            },
            SubTag {
                name: "无人驾驶训练场",
                keywords: &["无人驾驶训练场", "无人驾驶训练厂"],
            },
        ],
    },
    PrimaryTag {
        name: OTHER_INDUSTRY,
        sub_tags: &[],
    },
];

pub fn primary_tag(name: &str) -> Option<&'static PrimaryTag> {
    TAG_TREE.iter().find(|p| p.name == name)
}

/// Qualification sub-groups used as the project name of 图安资质 documents.
pub const QUALIFICATION_GROUPS: &[(&str, &[&str])] = &[
    (
        "公司介绍（含产品介绍）",
        &["公司介绍", "产品介绍", "产品手册", "宣传册"],
    ),
    ("相关证书", &["证书", "认证", "资信", "荣誉"]),
    ("专利", &["专利"]),
    ("著作权", &["著作权", "软著", "软件著作权"]),
    (
        "测试报告",
        &["测试报告", "检测报告", "检验报告", "测评报告"],
    ),
    ("合同业绩", &["合同业绩", "业绩", "案例合同", "项目合同"]),
    (
        "人员资质",
        &["人员资质", "人员证书", "工程师", "职称", "建造师"],
    ),
];

pub const QUALIFICATION_MARKER: &str = "图安世纪资质";
pub const QUALIFICATION_CATEGORY: &str = "图安资质";

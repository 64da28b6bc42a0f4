use crate::foundation::core::Rgba8;
use crate::model::{DayId, NEW_YEAR_DAYS};

/// Colors of one day's card.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DayPalette {
    pub top: Rgba8,
    pub bottom: Rgba8,
    pub accent: Rgba8,
    pub ink: Rgba8,
}

/// Copy and colors shared by a day's poster, concept card and story card.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DayInfo {
    pub number: u8,
    /// Calendar name, e.g. 除夕, 初一.
    pub name: &'static str,
    /// Custom observed that day.
    pub custom: &'static str,
    /// Four-character blessing shown on the poster.
    pub blessing: &'static str,
    /// Concept card explanation.
    pub concept: &'static str,
    /// Folk story used when the caller supplies none.
    pub story: &'static str,
    pub palette: DayPalette,
}

impl DayInfo {
    pub fn key(&self) -> String {
        DayId::from_number(u32::from(self.number)).to_string()
    }
}

const NIGHT: DayPalette = DayPalette {
    top: Rgba8::rgb(12, 18, 43),
    bottom: Rgba8::rgb(58, 22, 40),
    accent: Rgba8::rgb(232, 190, 92),
    ink: Rgba8::rgb(250, 240, 220),
};

const CINNABAR: DayPalette = DayPalette {
    top: Rgba8::rgb(168, 24, 30),
    bottom: Rgba8::rgb(112, 12, 20),
    accent: Rgba8::rgb(240, 200, 110),
    ink: Rgba8::rgb(255, 244, 228),
};

const RICE: DayPalette = DayPalette {
    top: Rgba8::rgb(250, 244, 232),
    bottom: Rgba8::rgb(238, 226, 204),
    accent: Rgba8::rgb(178, 34, 34),
    ink: Rgba8::rgb(40, 32, 28),
};

const JADE: DayPalette = DayPalette {
    top: Rgba8::rgb(226, 236, 228),
    bottom: Rgba8::rgb(190, 210, 198),
    accent: Rgba8::rgb(160, 40, 36),
    ink: Rgba8::rgb(30, 48, 42),
};

const HEARTH: DayPalette = DayPalette {
    top: Rgba8::rgb(70, 28, 18),
    bottom: Rgba8::rgb(150, 64, 26),
    accent: Rgba8::rgb(255, 196, 96),
    ink: Rgba8::rgb(255, 238, 214),
};

const GILT: DayPalette = DayPalette {
    top: Rgba8::rgb(120, 14, 22),
    bottom: Rgba8::rgb(70, 8, 14),
    accent: Rgba8::rgb(246, 208, 102),
    ink: Rgba8::rgb(255, 236, 190),
};

const WIND: DayPalette = DayPalette {
    top: Rgba8::rgb(236, 232, 222),
    bottom: Rgba8::rgb(206, 214, 220),
    accent: Rgba8::rgb(150, 36, 36),
    ink: Rgba8::rgb(34, 38, 46),
};

const SPRING: DayPalette = DayPalette {
    top: Rgba8::rgb(248, 238, 226),
    bottom: Rgba8::rgb(232, 212, 200),
    accent: Rgba8::rgb(186, 52, 60),
    ink: Rgba8::rgb(48, 34, 30),
};

const LANTERN_NIGHT: DayPalette = DayPalette {
    top: Rgba8::rgb(20, 14, 50),
    bottom: Rgba8::rgb(96, 20, 36),
    accent: Rgba8::rgb(255, 206, 110),
    ink: Rgba8::rgb(255, 242, 222),
};

/// The nine days, `ny_01` (除夕) through `ny_09` (元宵).
pub const DAYS: [DayInfo; NEW_YEAR_DAYS as usize] = [
    DayInfo {
        number: 1,
        name: "除夕",
        custom: "守岁",
        blessing: "辞旧迎新",
        concept: "除夕是农历年的最后一夜。一家人围炉守岁，灯火通宵不灭，寓意把旧岁的晦气驱尽，迎接新年。",
        story: "相传年兽每到岁末出来伤人，人们发现它怕红色、火光和声响，便贴红联、燃爆竹、彻夜不眠，年兽再不敢来。",
        palette: NIGHT,
    },
    DayInfo {
        number: 2,
        name: "初一",
        custom: "拜年",
        blessing: "万象更新",
        concept: "正月初一为岁首，早起穿新衣，先拜长辈，再走亲访友，互道吉祥。这一天忌扫地，以免扫走福气。",
        story: "古人以初一为元日，王安石写下\u{201c}千门万户曈曈日，总把新桃换旧符\u{201d}，说的正是这一天的气象。",
        palette: CINNABAR,
    },
    DayInfo {
        number: 3,
        name: "初二",
        custom: "回门",
        blessing: "阖家安康",
        concept: "初二是出嫁的女儿带着夫婿回娘家的日子，要备礼品与红包，娘家则设宴相待。",
        story: "旧时女儿出嫁后难得归宁，初二回门便成了一年中最盼望的团聚。",
        palette: RICE,
    },
    DayInfo {
        number: 4,
        name: "初三",
        custom: "赤狗日",
        blessing: "静守安和",
        concept: "初三又称赤狗日，传说易生口角，民间多不出门拜年，在家歇息，也有烧门神纸的习俗。",
        story: "这一天也叫小年朝，人们早早睡下，把夜晚让给老鼠嫁女，免得惊扰它们。",
        palette: JADE,
    },
    DayInfo {
        number: 5,
        name: "初四",
        custom: "迎灶神",
        blessing: "五谷丰登",
        concept: "初四迎接腊月上天述职的灶王爷回到人间，家家备好供品、点香燃烛，祈求一年饮食丰足。",
        story: "灶王爷在人间记录一家善恶，年前上天禀报，初四归来，因此要以甜食相迎。",
        palette: HEARTH,
    },
    DayInfo {
        number: 6,
        name: "初五",
        custom: "破五",
        blessing: "招财进宝",
        concept: "初五俗称破五，许多禁忌到此解除。这一天迎财神、吃饺子，商铺多在此日开市。",
        story: "传说五路财神于初五出巡，商家抢先燃放爆竹，希望财神第一个走进自家店门。",
        palette: GILT,
    },
    DayInfo {
        number: 7,
        name: "初六",
        custom: "送穷",
        blessing: "除旧布新",
        concept: "初六送穷，把节日积下的垃圾清扫出门，寓意送走穷鬼，新的一年日子兴旺。",
        story: "相传颛顼之子好穿破衣、喝稀粥，死于正月晦日，后人便在此时送穷，盼望远离贫困。",
        palette: WIND,
    },
    DayInfo {
        number: 8,
        name: "初七 人日",
        custom: "人日",
        blessing: "人寿年丰",
        concept: "正月初七是人日，传说女娲第七日造人，这一天是所有人的生日。人们吃七宝羹，剪彩胜相赠。",
        story: "女娲初一造鸡、初二造狗，依次造出六畜，到第七日才抟土造人，故称人日。",
        palette: SPRING,
    },
    DayInfo {
        number: 9,
        name: "元宵",
        custom: "闹花灯",
        blessing: "花好月圆",
        concept: "正月十五是一年中第一个月圆之夜。人们赏花灯、猜灯谜、吃元宵，年节至此圆满收尾。",
        story: "汉代起元宵便有燃灯之俗，唐时长安开放夜禁，满城灯火，人们彻夜游赏。",
        palette: LANTERN_NIGHT,
    },
];

/// Day for `id`; unknown ids get `ny_01`.
pub fn day_info(id: &DayId) -> &'static DayInfo {
    id.number()
        .and_then(|n| DAYS.get(usize::from(n) - 1))
        .unwrap_or(&DAYS[0])
}
